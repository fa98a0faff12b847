use crate::model::HistoryRecord;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::sync::OnceLock;
use std::time::Duration;

// Global clipboard manager channel - initialized once on first use
static CLIPBOARD_SENDER: OnceLock<std_mpsc::Sender<String>> = OnceLock::new();

/// File name used when exporting a history record.
pub fn export_file_name(r: &HistoryRecord) -> String {
    let stamp = r.created_at_display().replace(':', "-").replace('T', "_");
    let short_id: String = r.id.chars().take(8).collect();
    format!(
        "threadcraft-{}-{}-{short_id}.json",
        r.format.as_str(),
        stamp
    )
}

/// Export a record as JSON into `dir`. Returns the absolute path of the written file.
pub fn export_record_json(r: &HistoryRecord, dir: &Path) -> Result<PathBuf> {
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .context("get current directory")?
            .join(dir)
    };
    let path = dir.join(export_file_name(r));
    crate::storage::export_json(&path, r)?;
    Ok(path)
}

/// Initialize the clipboard manager thread if not already initialized.
/// Each copy gets its own clipboard instance, kept alive long enough for clipboard managers to
/// read it on Linux.
fn init_clipboard_manager() -> Result<&'static std_mpsc::Sender<String>> {
    CLIPBOARD_SENDER.get_or_init(|| {
        let (tx, rx) = std_mpsc::channel::<String>();

        std::thread::spawn(move || {
            use arboard::Clipboard;

            for text in rx {
                match Clipboard::new() {
                    Ok(mut clipboard) => {
                        if clipboard.set_text(&text).is_ok() {
                            std::thread::sleep(Duration::from_secs(2));
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "clipboard unavailable"),
                }
            }
        });

        tx
    });

    CLIPBOARD_SENDER
        .get()
        .ok_or_else(|| anyhow::anyhow!("Failed to initialize clipboard manager"))
}

/// Queue `text` for the clipboard without blocking the UI thread.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let sender = init_clipboard_manager()?;
    sender
        .send(text.to_string())
        .map_err(|_| anyhow::anyhow!("Clipboard manager channel closed"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlatformFormat;
    use time::macros::datetime;

    fn record() -> HistoryRecord {
        HistoryRecord {
            id: "0123456789abcdef".into(),
            owner_id: "u1".into(),
            format: PlatformFormat::PhotoCaption,
            prompt: "beach".into(),
            content: "Sunny day".into(),
            created_at: datetime!(2024-05-01 12:30 UTC),
        }
    }

    #[test]
    fn export_name_is_filesystem_friendly() {
        let name = export_file_name(&record());
        assert!(name.starts_with("threadcraft-photo-caption-2024-05-01_12-30-00Z-01234567"));
        assert!(!name.contains(':'));
    }

    #[test]
    fn export_name_handles_short_and_non_ascii_ids() {
        let mut r = record();
        r.id = "éééééééééé".into();
        assert!(export_file_name(&r).ends_with("-éééééééé.json"));
        r.id = "ab".into();
        assert!(export_file_name(&r).ends_with("-ab.json"));
    }

    #[test]
    fn export_writes_record_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_record_json(&record(), dir.path()).unwrap();
        let back: HistoryRecord =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, record());
    }
}
