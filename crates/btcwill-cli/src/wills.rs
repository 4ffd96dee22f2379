use std::{
    fmt::Write as _,
    fs,
    io::{self, Read},
    path::Path,
    sync::Arc,
};

use btcwill_codec::{key::resolve_secret, Codec};
use btcwill_compiler::{compile, compile_value, render, DocumentSection};
use btcwill_core::{
    storage::BlobStore,
    wills::{WillDraft, WillRepository, WillUpdate},
};
use btcwill_repo::CodecWillRepo;
use color_eyre::{eyre::eyre, Result};
use serde_json::Value;
use tracing::debug;

use crate::{
    cli::{Format, WillCommand},
    config::Config,
    storage,
};

/// Build the process-wide codec from env/config.
pub fn codec_from_config(config: &Config) -> Codec {
    let (secret, source) = resolve_secret(config.encryption_key.as_deref());
    debug!(?source, "resolved codec secret");
    Codec::new(&secret)
}

/// Execute a will subcommand against the file store.
pub async fn handle(cmd: WillCommand, config: &Config) -> Result<()> {
    let store = storage::store_from_config(config)?;
    let repo = CodecWillRepo::new(store, Arc::new(codec_from_config(config)));
    let output = execute(cmd, &repo, &config.owner()).await?;
    print!("{output}");
    Ok(())
}

/// Run one command and return what should be printed.
pub async fn execute<R: WillRepository>(
    cmd: WillCommand,
    repo: &R,
    owner: &str,
) -> Result<String> {
    let mut out = String::new();
    match cmd {
        WillCommand::Create { title, input } => {
            let draft = match input {
                Some(path) => WillDraft::from_value(title, &read_input(&path)?)?,
                None => WillDraft {
                    title,
                    ..WillDraft::default()
                },
            };
            let will = repo.create(owner, draft).await.map_err(to_eyre)?;
            writeln!(out, "Created will {}: {}", will.id, will.title)?;
        }
        WillCommand::List => {
            let wills = repo.list(owner).await.map_err(to_eyre)?;
            if wills.is_empty() {
                writeln!(out, "No wills yet. Create one with `btcwill create`.")?;
            }
            for will in wills {
                writeln!(
                    out,
                    "{} [{}] {}  (updated {})",
                    will.id,
                    will.status,
                    will.title,
                    will.updated_at.format("%Y-%m-%d %H:%M")
                )?;
            }
        }
        WillCommand::Show { id } => {
            let will = repo.get(owner, id).await.map_err(to_eyre)?;
            let record = repo.open(owner, id).await.map_err(to_eyre)?;
            writeln!(out, "{} [{}]", will.title, will.status)?;
            writeln!(out, "id:      {}", will.id)?;
            writeln!(out, "created: {}", will.created_at.to_rfc3339())?;
            writeln!(out, "updated: {}", will.updated_at.to_rfc3339())?;
            writeln!(out, "{}", serde_json::to_string_pretty(&record)?)?;
        }
        WillCommand::Update {
            id,
            input,
            title,
            status,
        } => {
            let mut update = match input {
                Some(path) => WillUpdate::from_value(&read_input(&path)?)?,
                None => WillUpdate::default(),
            };
            update.title = title;
            update.status = status;
            if update.is_empty() {
                return Err(eyre!("nothing to update: pass --input, --title or --status"));
            }
            let will = repo.update(owner, id, update).await.map_err(to_eyre)?;
            writeln!(out, "Updated will {}: {} [{}]", will.id, will.title, will.status)?;
        }
        WillCommand::Compile { id, format } => {
            let record = repo.open(owner, id).await.map_err(to_eyre)?;
            out = format_sections(&compile(&record), format)?;
        }
        WillCommand::Preview { input, format } => {
            let sections = compile_value(&read_input(&input)?)?;
            out = format_sections(&sections, format)?;
        }
        WillCommand::Delete { id } => {
            repo.delete(owner, id).await.map_err(to_eyre)?;
            writeln!(out, "Deleted will {id}")?;
        }
    }
    Ok(out)
}

fn format_sections(sections: &[DocumentSection], format: Format) -> Result<String> {
    Ok(match format {
        Format::Text => render::plain_text(sections),
        Format::Json => format!("{}\n", serde_json::to_string_pretty(sections)?),
    })
}

/// Read a JSON record from a file, or stdin for `-`.
fn read_input(path: &Path) -> Result<Value> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };
    // Blank input is an empty record, not a parse error.
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_str(&raw)?)
}

fn to_eyre(err: anyhow::Error) -> color_eyre::Report {
    eyre!(err.to_string())
}

/// Write, read back and delete a probe blob.
pub async fn run_store_health<S: BlobStore>(store: &S) -> Result<()> {
    let probe_key = "health/probe";
    let payload = b"ok";
    store.put(probe_key, payload).await.map_err(|e| eyre!(e.to_string()))?;
    let round_trip = store.get(probe_key).await.map_err(|e| eyre!(e.to_string()))?;
    store.delete(probe_key).await.map_err(|e| eyre!(e.to_string()))?;

    if round_trip != payload {
        color_eyre::eyre::bail!("storage round-trip failed");
    }
    Ok(())
}

/// Strict encrypt/decrypt of a probe record; no plaintext fallback allowed.
pub fn run_codec_health(codec: &Codec) -> Result<()> {
    let probe = serde_json::json!({"probe": "ok"});
    let blob = codec.try_encrypt(&probe).map_err(|e| eyre!(e.to_string()))?;
    let round_trip = codec.try_decrypt(&blob).map_err(|e| eyre!(e.to_string()))?;
    if round_trip != probe {
        color_eyre::eyre::bail!("codec round-trip failed");
    }
    Ok(())
}
