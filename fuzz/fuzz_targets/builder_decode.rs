#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use edid_builder::{EdidBuilder, VtbExtBuilder};
use edid_decoder::{DiagnosticKind, EdidDecoder};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzVtb {
    dtds: Vec<[u8; 18]>,
    cvts: Vec<[u8; 3]>,
    standard: Vec<[u8; 2]>,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    revision: u8,
    blocks: Vec<FuzzVtb>,
}

// Fuzz target: builder -> decoder.
//
// Every VTB-EXT block the builder accepts has counts that fit, so the
// decoder must never report a structural violation for it.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(input) = FuzzInput::arbitrary(&mut u) else {
        return;
    };

    let mut builder = EdidBuilder::new();
    builder.revision(input.revision % 5);
    for block in input.blocks.iter().take(16) {
        let mut vtb = VtbExtBuilder::new();
        for dtd in &block.dtds {
            vtb.dtd_raw(*dtd);
        }
        for cvt in &block.cvts {
            vtb.cvt(*cvt);
        }
        for st in &block.standard {
            vtb.standard_timing(*st);
        }
        builder.add_vtb_ext(&vtb);
    }
    let Ok(bytes) = builder.build() else {
        return;
    };

    let report = EdidDecoder::decode(&bytes).unwrap();
    assert!(report
        .diagnostics
        .iter()
        .all(|d| d.kind != DiagnosticKind::StructuralViolation));
});
