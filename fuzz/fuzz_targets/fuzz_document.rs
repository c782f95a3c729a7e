#![no_main]
use colorswatch::{BlockDecoder, DocumentParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let parser = DocumentParser::new().max_name_len(64).max_document_len(4096);

    let slice = parser.parse_slice(data);
    let stream = parser.parse_stream(data);
    match (&slice, &stream) {
        (Ok(a), Ok(b)) => assert_eq!(format!("{:?}", a), format!("{:?}", b)),
        (Err(a), Err(b)) => {
            assert_eq!(a.offset(), b.offset());
            assert_eq!(a.to_string(), b.to_string());
        }
        _ => panic!("decode paths disagree: {:?} vs {:?}", slice, stream),
    }

    if let Ok(doc) = slice {
        for block in doc.iter() {
            if block.kind().is_encodable() {
                assert!(block.to_bytes().is_ok());
            }
        }

        #[cfg(feature = "json")]
        let _ = doc.to_json(false);
    }

    let mut decoder = BlockDecoder::new(parser.field_reader(data));
    while let Ok(Some(_)) = decoder.next_block() {}
    let _ = decoder.next_block();
});
