//! Resolving block values against the dynamic stores.

use crate::error::CoreResult;
use crate::record::PropertyBlock;
use crate::store::Stores;
use recordview_codec::{decode_dynamic, decode_inline, PropertyType, Value};

impl PropertyBlock {
    /// Decodes the value of this block.
    ///
    /// Inline values decode from the block slots; strings and arrays read
    /// their dynamic chain from the string or array store.
    ///
    /// # Errors
    ///
    /// Fails with a codec error for undecodable payloads and with a chain
    /// corruption for damaged dynamic chains.
    pub fn value(&self, stores: &Stores) -> CoreResult<Value> {
        let ty = self.property_type();
        let (store, head) = match (ty, self.dynamic_id()) {
            (PropertyType::String, Some(head)) => (stores.strings(), head),
            (PropertyType::Array, Some(head)) => (stores.arrays(), head),
            _ => return Ok(decode_inline(ty, self.slots())?),
        };
        let payload = store.read_chain(head)?;
        Ok(decode_dynamic(ty, &payload)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::record::PropertyBlock;
    use crate::store::Stores;
    use recordview_codec::{encode_dynamic, PropertyType, Value};

    fn stores() -> Stores {
        Stores::in_memory(Config::default().dynamic_record_size(16)).unwrap()
    }

    #[test]
    fn inline_value() {
        let stores = stores();
        let block = PropertyBlock::inline(3, &Value::Double(2.5)).unwrap();
        assert_eq!(block.value(&stores).unwrap(), Value::Double(2.5));
    }

    #[test]
    fn string_value_spans_records() {
        let stores = stores();
        let value = Value::from("a string longer than one dynamic record");
        let head = stores.strings().write_chain(&encode_dynamic(&value).unwrap()).unwrap();

        let block = PropertyBlock::pointer(1, PropertyType::String, head).unwrap();
        assert_eq!(block.value(&stores).unwrap(), value);
    }

    #[test]
    fn array_value() {
        let stores = stores();
        let value = Value::from(vec![1i64, -2, 3]);
        let head = stores.arrays().write_chain(&encode_dynamic(&value).unwrap()).unwrap();

        let block = PropertyBlock::pointer(1, PropertyType::Array, head).unwrap();
        assert_eq!(block.value(&stores).unwrap(), value);
    }

    #[test]
    fn dangling_pointer_is_corruption() {
        let stores = stores();
        let block = PropertyBlock::pointer(1, PropertyType::String, 40).unwrap();
        assert!(block.value(&stores).unwrap_err().is_corruption());
    }

    #[test]
    fn bad_utf8_is_corruption() {
        let stores = stores();
        let head = stores.strings().write_chain(&[0xFF, 0xFE]).unwrap();
        let block = PropertyBlock::pointer(1, PropertyType::String, head).unwrap();
        assert!(block.value(&stores).unwrap_err().is_corruption());
    }
}
