//! Backup and restore CLI commands
//!
//! `backup [PATH]` and `restore [PATH]` work on local files; `backup github`
//! and `restore github` use GitHub Gists. Without `--book` every book is
//! handled, and PATH names a directory holding one file per book.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::backup::{BackupOrchestrator, BackupTarget};
use crate::config::Preferences;
use crate::error::{PlannerError, PlannerResult};
use crate::models::DocumentKind;
use crate::remote::AuthToken;
use crate::storage::Storage;

/// Keyword selecting remote storage instead of a path
pub const REMOTE_KEYWORD: &str = "github";

/// Environment variable holding the GitHub token
pub const TOKEN_ENV: &str = "PLANNER_GITHUB_TOKEN";

/// Arguments shared by `backup` and `restore`
#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Backup file (with --book) or directory, or `github` for GitHub Gists
    pub target: Option<String>,

    /// GitHub personal access token; prompted for when absent
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub token: Option<String>,

    /// Only this book (address or expense)
    #[arg(short, long)]
    pub book: Option<DocumentKind>,
}

impl TransferArgs {
    fn kinds(&self) -> Vec<DocumentKind> {
        match self.book {
            Some(kind) => vec![kind],
            None => DocumentKind::ALL.to_vec(),
        }
    }

    fn is_remote(&self) -> bool {
        self.target
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(REMOTE_KEYWORD))
    }

    /// Local backup file for `kind`
    fn local_path(&self, preferences: &Preferences, kind: DocumentKind) -> PathBuf {
        match (&self.target, self.book) {
            (None, _) => preferences.backup_path(kind),
            (Some(path), Some(_)) => PathBuf::from(path),
            (Some(dir), None) => Path::new(dir).join(kind.backup_file_name()),
        }
    }

    fn local_targets(&self, preferences: &Preferences) -> Vec<BackupTarget> {
        self.kinds()
            .into_iter()
            .map(|kind| BackupTarget::local(kind, self.local_path(preferences, kind)))
            .collect()
    }
}

/// Handle `backup`
pub fn handle_backup_command(
    storage: &mut Storage,
    orchestrator: &mut BackupOrchestrator,
    preferences: &Preferences,
    args: TransferArgs,
) -> PlannerResult<()> {
    if args.is_remote() {
        let token = resolve_token(args.token.as_deref())?;
        let kinds = args.kinds();
        orchestrator.backup_all_remote(storage, &kinds, &token)?;
        println!(
            "Backing up {} to {}...",
            describe(&kinds),
            orchestrator.service_name()
        );
        return Ok(());
    }

    let targets = args.local_targets(preferences);
    match targets.as_slice() {
        [target] => {
            let path = target.local_path()?;
            orchestrator.backup_local(&storage.snapshot(target.kind()), path)?;
        }
        targets => {
            orchestrator.backup_all_local(storage, targets);
        }
    }
    Ok(())
}

/// Handle `restore`
pub fn handle_restore_command(
    storage: &mut Storage,
    orchestrator: &mut BackupOrchestrator,
    preferences: &Preferences,
    args: TransferArgs,
) -> PlannerResult<()> {
    if args.is_remote() {
        let kinds = args.kinds();
        let targets: Vec<BackupTarget> = kinds
            .iter()
            .map(|kind| preferences.remote_target(*kind))
            .collect();
        // Fail on a missing reference before asking for a token
        for target in &targets {
            target.required_reference()?;
        }

        let token = resolve_token(args.token.as_deref())?;
        match targets.as_slice() {
            [target] => {
                orchestrator.restore_remote(target, &token)?;
            }
            targets => {
                orchestrator.restore_all_remote(targets, &token)?;
            }
        }
        println!(
            "Restoring {} from {}...",
            describe(&kinds),
            orchestrator.service_name()
        );
        return Ok(());
    }

    let targets = args.local_targets(preferences);
    match targets.as_slice() {
        [target] => {
            let path = target.local_path()?;
            orchestrator.restore_local(storage, target.kind(), path)?;
        }
        targets => {
            orchestrator.restore_all_local(storage, targets);
        }
    }
    Ok(())
}

/// Token from the argument or environment, else a hidden prompt
fn resolve_token(given: Option<&str>) -> PlannerResult<AuthToken> {
    let token = match given {
        Some(token) if !token.trim().is_empty() => AuthToken::new(token),
        _ => rpassword::prompt_password("GitHub personal access token: ")
            .map(AuthToken::new)
            .map_err(|e| PlannerError::Auth(format!("Failed to read token: {}", e)))?,
    };

    if token.is_blank() {
        return Err(PlannerError::Validation(
            "A GitHub personal access token is required".into(),
        ));
    }
    Ok(token)
}

fn describe(kinds: &[DocumentKind]) -> String {
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" and ")
}
