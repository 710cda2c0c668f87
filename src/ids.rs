use uuid::Uuid;

const TXN_PREFIX: &str = "TXN";
const TXN_CODE_LEN: usize = 6;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Human-readable payment code, `TXN` followed by six uppercase hex digits.
///
/// The short form can collide, so the caller passes a predicate for codes already taken.
pub fn new_transaction_code(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let hex = Uuid::new_v4().simple().to_string();
        let code = format!("{}{}", TXN_PREFIX, hex[..TXN_CODE_LEN].to_ascii_uppercase());
        if !taken(&code) {
            return code;
        }
    }
}
