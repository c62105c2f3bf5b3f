//! Storage key derivation.
//!
//! All keys are pure functions of their inputs. Order keys must sort the
//! same way as the signed sequence numbers they carry, so negative numbers
//! are written as a complement against `10^10` rather than as an absolute
//! value:
//!
//! ```text
//!   -5 -> N9999999995
//!   -1 -> N9999999999
//!    0 -> P0000000000
//!    3 -> P0000000003
//! ```

/// Separator between key components.
pub const KEY_SEPARATOR: &str = "~";
/// Terminates every order key; reserved for sub-ordering.
pub const ORDER_KEY_SUFFIX: &str = "_";

const POSITIVE_PREFIX: char = 'P';
const NEGATIVE_PREFIX: char = 'N';
const SEQUENCE_WIDTH: usize = 10;
const NEGATIVE_OFFSET: i64 = 10_000_000_000;

/// `contractId ~ category`.
pub fn partition_key(contract_id: &str, category: &str) -> String {
    format!("{contract_id}{KEY_SEPARATOR}{category}")
}

/// `effectiveDate ~ encodedSequence _`.
pub fn order_key(effective_date: &str, sequence_number: i32) -> String {
    format!(
        "{effective_date}{KEY_SEPARATOR}{}{ORDER_KEY_SUFFIX}",
        encode_sequence(sequence_number)
    )
}

/// Event-order id, zero-padded to six digits.
pub fn sort_key(event_order_id: i32) -> String {
    format!("{event_order_id:06}")
}

/// `commandId ~ commandIdSource`.
pub fn command_key(command_id: &str, command_id_source: &str) -> String {
    format!("{command_id}{KEY_SEPARATOR}{command_id_source}")
}

/// Encode a signed sequence number so lexical order matches numeric order.
pub fn encode_sequence(sequence_number: i32) -> String {
    let n = i64::from(sequence_number);
    if n >= 0 {
        format!("{POSITIVE_PREFIX}{n:0width$}", width = SEQUENCE_WIDTH)
    } else {
        format!(
            "{NEGATIVE_PREFIX}{:0width$}",
            NEGATIVE_OFFSET + n,
            width = SEQUENCE_WIDTH
        )
    }
}

/// Inverse of [`encode_sequence`]. Returns `None` for anything it would not produce.
pub fn decode_sequence(encoded: &str) -> Option<i32> {
    let mut chars = encoded.chars();
    let prefix = chars.next()?;
    let digits = chars.as_str();
    if digits.len() != SEQUENCE_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    let n = match prefix {
        POSITIVE_PREFIX => value,
        NEGATIVE_PREFIX => value - NEGATIVE_OFFSET,
        _ => return None,
    };
    i32::try_from(n).ok()
}
