//! Undo/redo CLI commands

use clap::Args;

use crate::error::PlannerResult;
use crate::models::DocumentKind;
use crate::storage::Storage;

/// Which book's history to step through
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Book to undo/redo (address or expense)
    #[arg(short, long, default_value = "address")]
    pub book: DocumentKind,
}

pub fn handle_undo_command(storage: &mut Storage, args: HistoryArgs) -> PlannerResult<()> {
    storage.undo(args.book)?;
    println!("Undo successful ({})", args.book);
    Ok(())
}

pub fn handle_redo_command(storage: &mut Storage, args: HistoryArgs) -> PlannerResult<()> {
    storage.redo(args.book)?;
    println!("Redo successful ({})", args.book);
    Ok(())
}
