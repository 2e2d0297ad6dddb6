#![no_main]

use edid_wire::cursor::ByteCursor;
use libfuzzer_sys::fuzz_target;

// Fuzz target: ByteCursor reads driven by the input itself.
//
// Each step reads a length byte and then tries to take that many bytes.
// A read either succeeds inside the buffer or fails without moving.
fuzz_target!(|data: &[u8]| {
    let mut cursor = ByteCursor::new(data);
    while let Ok(len) = cursor.read_u8() {
        let before = cursor.position();
        match cursor.read_slice(usize::from(len)) {
            Ok(slice) => {
                assert_eq!(slice.len(), usize::from(len));
                assert!(cursor.position() <= data.len());
            }
            Err(_) => {
                assert_eq!(cursor.position(), before);
                break;
            }
        }
    }
});
