//! PDFs for tests

/// One US Letter page: "CLIMATE RISK DISCLOSURE" in 24pt Helvetica at
/// baseline y=720, then "The company reduced emissions by 10%." in 12pt at y=680.
pub const SAMPLE_PDF: &[u8] = include_bytes!("../../tests/fixtures/esg_sample.pdf");
