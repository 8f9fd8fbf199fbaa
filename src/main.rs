use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod collage;
mod error;
mod export;
mod photo;
mod state;

use error::Result;
use state::data::{Gender, Identity, SessionPhase, REQUIRED_SLOTS, SLOT_COUNT};
use state::session::Session;
use state::store::Store;

/// A local photo scavenger-hunt mission tracker.
///
/// Register, fill numbered photo slots, submit once the threshold is
/// reached, and export a collage certificate.
#[derive(Parser)]
#[command(name = "snaphunt", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register the participant and start the mission
    Register {
        #[arg(long)]
        given_name: String,
        #[arg(long)]
        family_name: String,
        #[arg(long)]
        age: u32,
        #[arg(long, value_enum)]
        gender: Gender,
    },
    /// Put a photo into a numbered slot (1..=20)
    Add {
        slot: u32,
        photo: PathBuf,
    },
    /// Clear a slot
    Remove {
        slot: u32,
    },
    /// Fill free slots from a folder of photos
    Import {
        folder: PathBuf,
    },
    /// Show mission progress
    Status,
    /// Submit the mission (requires the completion threshold)
    Submit,
    /// Export the collage certificate image
    Export {
        /// Directory the certificate is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Clear all session data and start over
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let store = Store::open_default()?;
    let mut session = Session::load(&store)?;

    match cli.command {
        Command::Register {
            given_name,
            family_name,
            age,
            gender,
        } => {
            session.register(Identity {
                given_name,
                family_name,
                age,
                gender,
            })?;
            session.save(&store)?;
            let identity = session.identity.as_ref().ok_or(error::Error::NotRegistered)?;
            println!("🎉 Welcome, {}! The mission has started.", identity.full_name());
            println!(
                "Fill at least {} of the {} slots, then `submit`.",
                REQUIRED_SLOTS, SLOT_COUNT
            );
        }

        Command::Add { slot, photo } => {
            let record = photo::ingest::ingest_slot(slot, &photo)?;
            session.add_photo(record)?;
            session.save(&store)?;
            println!("📸 Slot {} filled ({}).", slot, progress_line(&session));
        }

        Command::Remove { slot } => {
            session.remove_photo(slot)?;
            session.save(&store)?;
            println!("🗑️  Slot {} cleared ({}).", slot, progress_line(&session));
        }

        Command::Import { folder } => {
            println!("🔍 Scanning folder: {}", folder.display());
            let result = photo::import::import_folder(&mut session, &folder)?;
            session.save(&store)?;
            println!(
                "✅ Import complete! Added {} photos, skipped {}.",
                result.imported, result.skipped
            );
            if result.board_full {
                println!("All {} slots are filled; remaining files were ignored.", SLOT_COUNT);
            }
            println!("{}.", progress_line(&session));
        }

        Command::Status => {
            println!("🗄️  Store: {}", store.path().display());
            print_status(&session);
        }

        Command::Submit => {
            session.submit()?;
            session.save(&store)?;
            println!(
                "🏆 Mission submitted with {} points! Run `export` for your certificate.",
                session.filled()
            );
        }

        Command::Export { out } => {
            if session.phase != SessionPhase::Completed {
                return Err(error::Error::NotSubmitted);
            }
            let identity = session.identity.as_ref().ok_or(error::Error::NotRegistered)?;

            let runtime = tokio::runtime::Runtime::new()?;
            let outcome =
                runtime.block_on(collage::render::render_collage(identity, &session.gallery))?;

            let path = export::write_certificate(&out, identity, &outcome)?;
            println!("🖼️  Certificate saved to {}", path.display());
            if outcome.is_partial() {
                eprintln!(
                    "⚠️  Slots {:?} could not be decoded and show as placeholders.",
                    outcome.failed_slots
                );
            }
        }

        Command::Reset { yes } => {
            if !yes {
                println!("This wipes the participant, all photos, and progress.");
                println!("Re-run with --yes to confirm.");
                return Ok(());
            }
            session.reset(&store)?;
            println!("🔄 Session cleared. Run `register` to start a new mission.");
        }
    }

    Ok(())
}

fn progress_line(session: &Session) -> String {
    if session.is_complete() {
        format!("{} / {} — threshold reached", session.filled(), REQUIRED_SLOTS)
    } else {
        format!("{} / {}", session.filled(), REQUIRED_SLOTS)
    }
}

fn print_status(session: &Session) {
    match &session.identity {
        Some(identity) => println!(
            "👤 {} (age {}, {})",
            identity.full_name(),
            identity.age,
            identity.gender
        ),
        None => {
            println!("No participant registered yet. Run `register` to start.");
            return;
        }
    }

    println!("Phase: {}", session.phase);
    println!(
        "Progress: {} / {} required (up to {} total)",
        session.filled(),
        REQUIRED_SLOTS,
        SLOT_COUNT
    );

    let filled = session.gallery.slot_ids();
    if filled.is_empty() {
        println!("No slots filled yet.");
    } else {
        let list: Vec<String> = filled.iter().map(|id| format!("#{}", id)).collect();
        println!("Filled slots: {}", list.join(" "));
    }

    if session.phase == SessionPhase::Completed {
        println!("Mission submitted — `export` writes the certificate.");
    } else if session.is_complete() {
        println!(
            "Threshold reached! `submit` now, or keep going to {} slots.",
            SLOT_COUNT
        );
    } else {
        println!("{} more to reach the threshold.", session.remaining());
    }
}
