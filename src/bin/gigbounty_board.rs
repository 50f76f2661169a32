//! Command-line view of the bounty board.
//!
//! Usage:
//!
//! ```text
//! gigbounty_board [board [FILTER] | mine | leaderboard | balance | role ROLE
//!                 | claim ID | submit ID URL [--ai-verify] | approve ID
//!                 | cancel ID | dispute ID REASON... | verify ID
//!                 | post TITLE DESCRIPTION AMOUNT [DEADLINE]]
//! ```
//!
//! Settings come from `GIGBOUNTY_*` environment variables; the acting wallet
//! is `GIGBOUNTY_WALLET`. When the task service is unreachable the board
//! falls back to an in-memory fixture store.

use gigbounty::config::{ConfigError, GigBountyConfig};
use gigbounty::render::{RenderError, TaskRow, render_board, render_leaderboard, render_listing};
use gigbounty::session::{
    FileSessionStore, InMemorySessionStore, ParseRoleHintError, RoleHint, SessionStore,
    SessionStoreError, WalletSession,
};
use async_trait::async_trait;
use gigbounty::task::{
    adapters::{algod::AlgodLedger, http::HttpTaskGateway},
    domain::{ParseTaskStatusError, StatusFilter, Task, TaskId, WalletAddress},
    ports::{
        LedgerError, PaymentTransaction, SignedTransaction, TaskGatewayError, WalletError,
        WalletProvider,
    },
    services::{
        ActionHint, BoardError, EscrowFunding, Feedback, SelectionError, TaskBoard,
        select_gateway,
    },
};
use gigbounty::telemetry;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gateway(#[from] TaskGatewayError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Filter(#[from] ParseTaskStatusError),
    #[error(transparent)]
    Role(#[from] ParseRoleHintError),
    #[error(transparent)]
    Session(#[from] SessionStoreError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

const AI_VERIFY_FLAG: &str = "--ai-verify";

/// Wallet for a terminal session: it knows the configured address but holds
/// no keys, so deposits must be signed elsewhere.
struct AddressOnlyWallet {
    address: Option<WalletAddress>,
}

#[async_trait]
impl WalletProvider for AddressOnlyWallet {
    async fn connect(&self) -> Result<WalletAddress, WalletError> {
        self.address
            .clone()
            .ok_or_else(|| WalletError::Unavailable("GIGBOUNTY_WALLET is not set".to_owned()))
    }

    async fn sign(&self, _payment: &PaymentTransaction) -> Result<SignedTransaction, WalletError> {
        Err(WalletError::Unavailable(
            "no signing wallet is attached to the command line".to_owned(),
        ))
    }
}

#[derive(Debug)]
enum Command {
    Board(String),
    Mine,
    Leaderboard,
    Balance,
    Role(String),
    Claim(TaskId),
    Submit {
        id: TaskId,
        proof_url: String,
        ai_verify: bool,
    },
    Approve(TaskId),
    Cancel(TaskId),
    Dispute {
        id: TaskId,
        reason: String,
    },
    Verify(TaskId),
    Post {
        title: String,
        description: String,
        amount: String,
        deadline: Option<String>,
    },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, CliError> {
        let (name, rest) = match args.split_first() {
            Some((name, rest)) => (name.as_str(), rest),
            None => ("board", &[] as &[String]),
        };
        let task_id = || {
            rest.first()
                .map(TaskId::new)
                .ok_or_else(|| CliError::InvalidArgs(format!("{name} needs a task id")))
        };
        match name {
            "board" => Ok(Self::Board(
                rest.first().cloned().unwrap_or_else(|| "All".to_owned()),
            )),
            "mine" => Ok(Self::Mine),
            "leaderboard" => Ok(Self::Leaderboard),
            "balance" => Ok(Self::Balance),
            "role" => rest
                .first()
                .cloned()
                .map(Self::Role)
                .ok_or_else(|| CliError::InvalidArgs("role needs poster or acceptor".to_owned())),
            "claim" => Ok(Self::Claim(task_id()?)),
            "approve" => Ok(Self::Approve(task_id()?)),
            "cancel" => Ok(Self::Cancel(task_id()?)),
            "verify" => Ok(Self::Verify(task_id()?)),
            "submit" => {
                let id = task_id()?;
                let (flags, positional): (Vec<&String>, Vec<&String>) = rest
                    .iter()
                    .skip(1)
                    .partition(|arg| arg.as_str() == AI_VERIFY_FLAG);
                Ok(Self::Submit {
                    id,
                    proof_url: positional.first().copied().cloned().unwrap_or_default(),
                    ai_verify: !flags.is_empty(),
                })
            }
            "dispute" => Ok(Self::Dispute {
                id: task_id()?,
                reason: rest.iter().skip(1).cloned().collect::<Vec<_>>().join(" "),
            }),
            "post" => match rest {
                [title, description, amount] => Ok(Self::Post {
                    title: title.clone(),
                    description: description.clone(),
                    amount: amount.clone(),
                    deadline: None,
                }),
                [title, description, amount, deadline] => Ok(Self::Post {
                    title: title.clone(),
                    description: description.clone(),
                    amount: amount.clone(),
                    deadline: Some(deadline.clone()),
                }),
                _ => Err(CliError::InvalidArgs(
                    "post needs TITLE DESCRIPTION AMOUNT [DEADLINE]".to_owned(),
                )),
            },
            other => Err(CliError::InvalidArgs(format!("unknown command '{other}'"))),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if !telemetry::init_tracing() {
        warn!("tracing subscriber already installed");
    }
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Board(board_error)) => {
            report_board_error(&board_error);
            ExitCode::FAILURE
        }
        Err(other) => {
            error!(error = %other, "gigbounty_board failed");
            ExitCode::FAILURE
        }
    }
}

fn report_board_error(board_error: &BoardError) {
    match board_error.feedback() {
        Some(Feedback::Inline(messages)) => {
            for message in messages {
                let field = message.field.map_or("input", |field| field.as_str());
                error!(field, "{}", message.message);
            }
        }
        Some(Feedback::Toast { message, refresh }) => error!(refresh, "{message}"),
        Some(Feedback::Blocked { message } | Feedback::Info { message }) => error!("{message}"),
        None => {}
    }
}

fn session_store(config: &GigBountyConfig) -> Box<dyn SessionStore> {
    match &config.session_dir {
        Some(dir) => Box::new(FileSessionStore::new(dir.clone())),
        None => Box::new(InMemorySessionStore::new()),
    }
}

async fn run(args: &[String]) -> Result<(), CliError> {
    let command = Command::parse(args)?;
    let config = GigBountyConfig::from_env()?;
    let store = session_store(&config);
    let mut session = WalletSession::restore(store.as_ref())?;
    if let Some(wallet) = &config.wallet {
        session.connect(wallet.clone());
    }

    let remote = Arc::new(HttpTaskGateway::new(&config.api_url, config.request_timeout)?);
    let gateway = select_gateway(remote, &config.fallback()).await?;
    let ledger = AlgodLedger::new(
        &config.algod_url,
        config.request_timeout,
        config.confirmation_rounds,
    )?;
    let wallet = AddressOnlyWallet {
        address: session.address().cloned(),
    };
    let board = TaskBoard::new(gateway)
        .with_policy(config.update_policy)
        .with_funding(EscrowFunding::new(Arc::new(wallet), Arc::new(ledger)));
    board.refresh(&session).await?;

    let mut out = io::stdout().lock();
    match command {
        Command::Board(label) => {
            let filter = StatusFilter::parse(&label)?;
            let rows = rows_for(&session, &board.filter(filter));
            writeln!(out, "{}", render_board(filter, board.mode(), &rows)?)?;
        }
        Command::Mine => {
            let Some(address) = session.address() else {
                return Err(BoardError::NotConnected.into());
            };
            let posted = rows_for(&session, &board.posted_by(address));
            let claimed = rows_for(&session, &board.claimed_by(address));
            writeln!(
                out,
                "{}",
                render_listing("Posted by me".to_owned(), board.mode(), &posted)?
            )?;
            writeln!(
                out,
                "{}",
                render_listing("Claimed by me".to_owned(), board.mode(), &claimed)?
            )?;
        }
        Command::Leaderboard => {
            writeln!(out, "{}", render_leaderboard(&board.leaderboard())?)?;
        }
        Command::Balance => {
            let address = session.address().ok_or(BoardError::NotConnected)?;
            let balance = board.wallet_balance(&session).await?;
            writeln!(out, "{address}: {balance} ALGO")?;
        }
        Command::Role(name) => {
            let role = RoleHint::parse(&name)?;
            session.set_role(role);
            session.persist(store.as_ref())?;
            writeln!(out, "role set to {role}")?;
        }
        Command::Claim(id) => print_task(&mut out, &board.claim(&session, &id).await?)?,
        Command::Submit {
            id,
            proof_url,
            ai_verify,
        } => print_task(
            &mut out,
            &board
                .submit_proof(&session, &id, &proof_url, ai_verify)
                .await?,
        )?,
        Command::Approve(id) => print_task(&mut out, &board.approve(&session, &id).await?)?,
        Command::Cancel(id) => print_task(&mut out, &board.cancel(&session, &id).await?)?,
        Command::Dispute { id, reason } => {
            print_task(&mut out, &board.dispute(&session, &id, &reason).await?)?;
        }
        Command::Verify(id) => {
            let verification = board.ai_verify(&session, &id).await?;
            writeln!(
                out,
                "{:?} (score {}): {}",
                verification.verdict,
                verification.score,
                verification.reasoning.unwrap_or_default()
            )?;
        }
        Command::Post {
            title,
            description,
            amount,
            deadline,
        } => {
            let mut request =
                gigbounty::task::services::PostTaskRequest::new(title, description, amount);
            if let Some(date) = deadline {
                request = request.with_deadline(date);
            }
            print_task(&mut out, &board.post_task(&session, request).await?)?;
        }
    }
    Ok(())
}

fn rows_for(session: &WalletSession, tasks: &[Task]) -> Vec<TaskRow> {
    tasks
        .iter()
        .map(|task| TaskRow::new(task, &ActionHint::for_task(session, task)))
        .collect()
}

fn print_task(out: &mut impl Write, task: &Task) -> io::Result<()> {
    writeln!(
        out,
        "{}  {}  {} ALGO  {}",
        task.id(),
        task.title(),
        task.amount(),
        task.status().display().label
    )
}
