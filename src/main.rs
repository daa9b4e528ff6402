use clap::{Parser, Subcommand};
use effdir::schema::schema_for;
use effdir::{isolate, refs, snapshot, EffDir};
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "effdir", about = "EffDir effect-directory codec CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an EffDir file and dump it as a JSON snapshot
    Read {
        input: PathBuf,
        /// Write the snapshot here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Encode a JSON snapshot back into an EffDir file
    Write {
        input: PathBuf,
        output: PathBuf,
    },
    /// Extract one effect (and everything it references) into a new file
    Isolate {
        /// Input EffDir file, or a .json snapshot of one
        input: PathBuf,
        output: PathBuf,
        /// Effect index in section 13
        #[arg(short, long)]
        index: usize,
        /// New name for the isolated effect
        #[arg(short, long)]
        name: String,
    },
    /// Show header, section counts, markers, and the effect listing
    Info {
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {

        // ── Read ─────────────────────────────────────────────────────────────
        Commands::Read { input, output } => {
            let doc = load_document(&input)?;
            match output {
                Some(path) => {
                    snapshot::save(&doc, File::create(&path)?)?;
                    println!("Snapshot written to {}", path.display());
                }
                None => println!("{}", snapshot::to_string(&doc)?),
            }
        }

        // ── Write ────────────────────────────────────────────────────────────
        Commands::Write { input, output } => {
            let doc = snapshot::load(File::open(&input)?)?;
            std::fs::write(&output, doc.to_bytes()?)?;
            println!("EffDir written to {}", output.display());
        }

        // ── Isolate ──────────────────────────────────────────────────────────
        Commands::Isolate { input, output, index, name } => {
            let doc = load_document(&input)?;
            let isolated = isolate(&doc, index, &name)?;
            std::fs::write(&output, isolated.to_bytes()?)?;
            println!("Isolated effect #{index} as '{name}' -> {}", output.display());
        }

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input } => {
            let doc = load_document(&input)?;
            println!("── EffDir ───────────────────────────────────────────────");
            println!("  Path     {}", input.display());
            println!("  Version  {}.{}", doc.version.0, doc.version.1);
            println!("  {:<11} {:>8}  Marker", "Section", "Entries");
            for number in 1..=15u8 {
                let section = doc.section(number);
                let marker = if section.eos.is_empty() {
                    "—".to_string()
                } else {
                    hex::encode(&section.eos)
                };
                println!("  {:<11} {:>8}  {}", schema_for(number).label, section.entries.len(), marker);
            }

            let effects = doc.section(13).entries.as_slice();
            // The last section 13 entry is the structural closing entry.
            println!("  Effects ({}):", effects.len().saturating_sub(1));
            for entry in effects.iter().take(effects.len().saturating_sub(1)) {
                println!(
                    "    {:<32} index_key={}",
                    entry.get_str("name").unwrap_or("?"),
                    entry.get_u32("index_key").unwrap_or(0),
                );
            }

            for (i, entry) in doc.section(12).entries.iter().enumerate() {
                let Some(prim) = entry.get_list("prim_index") else { continue };
                for (j, reference) in prim.iter().enumerate() {
                    if let Some(flag) = reference.get_u8("flag") {
                        if !refs::is_resolvable(flag) {
                            println!(
                                "  note: section 12 entry {i}, reference {j}: flag {flag} is reserved (kept as-is)"
                            );
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn load_document(path: &Path) -> Result<EffDir, Box<dyn std::error::Error>> {
    if path.extension().map(|e| e == "json").unwrap_or(false) {
        Ok(snapshot::load(File::open(path)?)?)
    } else {
        Ok(EffDir::decode(&std::fs::read(path)?)?)
    }
}
