//! Binary protobuf encoding via prost.

use bytes::Bytes;

use super::{CodecError, Message};

pub fn encode<M: Message>(message: &M) -> Bytes {
    Bytes::from(message.encode_to_vec())
}

pub fn decode<M: Message>(bytes: &[u8]) -> Result<M, CodecError> {
    Ok(M::decode(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haberdasher::Size;

    #[test]
    fn test_canonical_bytes() {
        let bytes = encode(&Size { inches: 42 });
        assert_eq!(bytes.as_ref(), &[0x08, 42]);
        assert_eq!(decode::<Size>(&bytes).unwrap().inches, 42);
    }

    #[test]
    fn test_empty_body_is_default() {
        assert_eq!(decode::<Size>(&[]).unwrap(), Size::default());
    }
}
