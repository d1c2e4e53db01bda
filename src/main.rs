use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use ara_push_payload::config::Settings;
use ara_push_payload::error;
use ara_push_payload::notification::{Payload, Rendered};
use ara_push_payload::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "push-payload",
    version,
    about = "Render a push notification payload that fits a byte budget"
)]
struct Cli {
    /// Payload JSON document, or `-` to read stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Byte budget for the rendered payload (overrides configuration)
    #[arg(long)]
    max_bytes: Option<usize>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration; failures here happen before logging is available
    let settings = Settings::new()?;
    telemetry::init_tracing(&settings.log)?;

    let max_bytes = cli.max_bytes.unwrap_or(settings.payload.max_bytes);

    let payload = match read_payload(&cli.input) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(
                code = %e.code(),
                error = %e,
                input = %cli.input.display(),
                "Failed to read payload"
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    match render(&payload, max_bytes) {
        Ok(rendered) => {
            io::stdout().lock().write_all(&rendered.bytes)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            // The token and extra data identify the notification for the caller
            tracing::error!(
                code = %e.code(),
                error = %e,
                token = %payload.token,
                extra_data = %payload.extra_data,
                "Failed to build payload"
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn read_payload(input: &Path) -> error::Result<Payload> {
    let raw = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input)?
    };

    Ok(serde_json::from_str(&raw)?)
}

fn render(payload: &Payload, max_bytes: usize) -> error::Result<Rendered> {
    let rendered = payload.marshal_rendered(max_bytes)?;

    tracing::info!(
        size = rendered.bytes.len(),
        max_bytes,
        truncated = rendered.truncated,
        shape = ?payload.shape(),
        priority = payload.priority().as_u8(),
        expires_at = ?payload.expires_at(),
        "Payload rendered"
    );

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_stdin() {
        let cli = Cli::parse_from(["push-payload"]);
        assert_eq!(cli.input, PathBuf::from("-"));
        assert_eq!(cli.max_bytes, None);
    }

    #[test]
    fn test_cli_max_bytes_override() {
        let cli = Cli::parse_from(["push-payload", "payload.json", "--max-bytes", "256"]);
        assert_eq!(cli.input, PathBuf::from("payload.json"));
        assert_eq!(cli.max_bytes, Some(256));
    }

    #[test]
    fn test_render_reports_payload_errors() {
        let mut payload = Payload::new("Hello");
        payload
            .custom_fields
            .insert("aps".to_string(), serde_json::json!(1));

        let err = render(&payload, 2048).unwrap_err();
        assert_eq!(err.code(), "RESERVED_KEY_COLLISION");
    }

    #[test]
    fn test_render_flags_truncation() {
        let payload = Payload::new("a".repeat(300));

        let rendered = render(&payload, 100).unwrap();
        assert!(rendered.truncated);
        assert_eq!(rendered.bytes.len(), 100);

        let rendered = render(&payload, 2048).unwrap();
        assert!(!rendered.truncated);
    }

    #[test]
    fn test_read_payload_from_file() {
        let path = std::env::temp_dir().join(format!("push-payload-{}.json", std::process::id()));
        fs::write(&path, r#"{"alert_text": "Hello", "badge": 2}"#).unwrap();

        let payload = read_payload(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let rendered = render(&payload, 2048).unwrap();
        assert_eq!(rendered.bytes, br#"{"aps":{"alert":"Hello","badge":2}}"#);
        assert!(!rendered.truncated);
    }

    #[test]
    fn test_read_payload_missing_file() {
        let err = read_payload(Path::new("/nonexistent/push-payload.json")).unwrap_err();
        assert_eq!(err.code(), "IO_ERROR");
    }
}
