//! Shared helpers for integration tests.

#![allow(dead_code)]

use schematic2brd::ConversionConfig;
use tracing_subscriber::EnvFilter;

/// Skip this test unless PDFIUM_TESTS is set. Rendering needs a pdfium
/// shared library, found via PDFIUM_LIB_PATH or the system search path.
macro_rules! pdfium_skip_unless_ready {
    () => {{
        if std::env::var("PDFIUM_TESTS").is_err() {
            println!("SKIP: set PDFIUM_TESTS=1 (and PDFIUM_LIB_PATH if needed) to run pdfium tests");
            return;
        }
    }};
}

/// Route library logs to the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Default config, bound to PDFIUM_LIB_PATH when present.
pub fn config() -> ConversionConfig {
    init_tracing();
    let mut builder = ConversionConfig::builder().timeout_secs(60);
    if let Ok(path) = std::env::var("PDFIUM_LIB_PATH") {
        builder = builder.pdfium_lib_path(path);
    }
    builder.build().expect("valid test config")
}

/// Content stream drawing a filled black square, 60 pt on a side, whose
/// lower-left corner sits at (50, 50) in PDF space. On a 200 pt page rendered
/// at 72 DPI it covers pixels x 50..110, y 90..150.
pub const BLACK_SQUARE: &str = "0 0 0 rg\n50 50 60 60 re\nf";

/// Build a minimal PDF with one 200x200 pt page per content stream.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 3 + 2 * i))
        .collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));

    for (i, content) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 200 200] /Contents {} 0 R /Resources << >> >>",
            4 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_at = out.len();
    let mut tail = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for off in offsets {
        tail.push_str(&format!("{:010} 00000 n \n", off));
    }
    tail.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));
    out.extend_from_slice(tail.as_bytes());
    out
}
