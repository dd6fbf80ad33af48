use anyhow::Result;
use clap::Parser;
use incinerator_client::{
    instructions::rpc::RpcLedger, load_cfg, KeypairWallet, Reclaimer, Session,
};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
pub struct Opts {
    #[arg(short, long, default_value = "client_config.ini")]
    pub config: String,
    #[clap(subcommand)]
    pub command: CommandsName,
}

#[derive(Debug, Parser)]
pub enum CommandsName {
    /// List the empty token accounts owned by the configured wallet.
    Scan,
    /// Close empty token accounts and reclaim their rent.
    Close {
        #[arg(required_unless_present = "all")]
        accounts: Vec<Pubkey>,
        #[arg(short, long)]
        all: bool,
    },
}

fn print_accounts(session: &Session) {
    if session.accounts().is_empty() {
        println!("No empty token accounts found.");
        return;
    }
    for account in session.accounts() {
        let marker = if session.selection().contains(&account.address) {
            "x"
        } else {
            " "
        };
        println!("[{}] {} mint {}", marker, account.address, account.mint);
    }
}

fn print_messages(session: &Session) {
    if let Some(error) = session.error_message() {
        println!("Error: {}", error);
    }
    if let Some(success) = session.success_message() {
        println!("{}", success);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();
    let config = load_cfg(&opts.config)?;
    let rpc_client = Arc::new(RpcClient::new_with_commitment(
        config.http_url.clone(),
        config.reclaim.commitment,
    ));
    let wallet = Arc::new(KeypairWallet::from_file(
        &config.payer_path,
        rpc_client.clone(),
    )?);
    let ledger = Arc::new(RpcLedger::new(rpc_client, config.confirm_timeout));
    let reclaimer = Reclaimer::new(ledger, wallet, config.reclaim);
    let mut session = Session::new();

    match reclaimer.connect(&mut session).await {
        Err(err) if session.error_message().is_none() => println!("Error: {}", err),
        Err(_) => {}
        Ok(_) => match opts.command {
            CommandsName::Scan => print_accounts(&session),
            CommandsName::Close { accounts, all } => {
                let targets: Vec<Pubkey> = if all {
                    session.accounts().iter().map(|a| a.address).collect()
                } else {
                    accounts
                };
                for address in targets {
                    if let Err(err) = reclaimer.toggle(&mut session, address) {
                        println!("Skipping {}: {}", address, err);
                    }
                }
                if let Ok(closed) = reclaimer.close_selected(&mut session).await {
                    println!("{}", closed.signature);
                }
                print_accounts(&session);
            }
        },
    }
    print_messages(&session);
    Ok(())
}
