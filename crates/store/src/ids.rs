use folio_types::RecordId;
use rand::Rng;

const ID_PREFIX: &str = "inv";

/// A fresh random record id, `inv-` followed by 16 hex digits.
pub fn generate_record_id() -> RecordId {
    let mut rng = rand::rng();
    let value: u64 = rng.random();
    RecordId::new(format!("{}-{:016x}", ID_PREFIX, value))
}
