use folio::resource::FilesystemResourceProvider;
use folio::types::InvoiceDocument;
use folio::{ExportBuilder, ViewTransform};
use std::env;
use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn usage(program: &str) -> ! {
    eprintln!("Exports an invoice document to a one-page A4 PDF.");
    eprintln!();
    eprintln!(
        "Usage: {} <path/to/invoice.json> <path/to/output-dir> [path/to/export-config.json]",
        program
    );
    process::exit(2);
}

/// Relative image references resolve against the invoice file's directory.
/// A bare file name has an empty parent, which means the working directory.
fn resource_base(input: &Path) -> &Path {
    input
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        usage(args.first().map(String::as_str).unwrap_or("folio"));
    }
    let input = Path::new(&args[1]);
    let output_dir = Path::new(&args[2]);

    let document: InvoiceDocument = match fs::read_to_string(input)
        .map_err(|e| e.to_string())
        .and_then(|json| serde_json::from_str(&json).map_err(|e| e.to_string()))
    {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Cannot read invoice from '{}': {}", input.display(), e);
            process::exit(1);
        }
    };

    let base = resource_base(input);
    let mut builder = ExportBuilder::new()
        .with_system_fonts(true)
        .with_resource_provider(Arc::new(FilesystemResourceProvider::new(base)));
    if let Some(config_path) = args.get(3) {
        builder = match builder.with_config_file(config_path) {
            Ok(builder) => builder,
            Err(e) => {
                eprintln!("{}", e.user_message());
                process::exit(1);
            }
        };
    }
    let exporter = match builder.build() {
        Ok(exporter) => exporter,
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(1);
        }
    };

    let view = exporter
        .surface()
        .mount_view(document, ViewTransform::default());
    let artifact = match exporter.export(view).await {
        Ok(artifact) => artifact,
        Err(e) => {
            eprintln!("{}", e.user_message());
            process::exit(1);
        }
    };

    match artifact.write_to_dir(output_dir) {
        Ok(path) => println!(
            "Wrote {} ({} bytes, invoice {})",
            path.display(),
            artifact.bytes.len(),
            artifact.invoice_number
        ),
        Err(e) => {
            eprintln!("Failed to generate PDF: cannot write to '{}': {}", output_dir.display(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_file_name_resolves_against_working_directory() {
        assert_eq!(resource_base(Path::new("invoice.json")), Path::new("."));
        assert_eq!(
            resource_base(Path::new("data/invoice.json")),
            Path::new("data")
        );
        assert_eq!(
            resource_base(Path::new("/srv/invoices/a.json")),
            Path::new("/srv/invoices")
        );
    }
}
