use rust_decimal::Decimal;
use solana_account_decoder::{parse_token::TokenAccountType, UiAccountData};
use solana_client::rpc_response::RpcKeyedAccount;
use solana_sdk::pubkey::Pubkey;

use crate::ledger::RawTokenAccount;

/// 1 SOL = 10^9 lamports.
pub const SOL_DECIMALS: u32 = 9;

pub fn lamports_to_sol(lamports: i128) -> Decimal {
    Decimal::from_i128_with_scale(lamports, SOL_DECIMALS)
}

/// Decodes a `jsonParsed` token account returned by `getTokenAccountsByOwner`.
///
/// Returns `None` only if the account address itself is malformed. Mint and
/// amount are left empty when the data is not a parsed SPL token account.
pub fn parse_token_account(
    keyed_account: &RpcKeyedAccount,
    token_program: &Pubkey,
) -> Option<RawTokenAccount> {
    let address = keyed_account.pubkey.parse::<Pubkey>().ok()?;
    let mut raw = RawTokenAccount {
        address,
        token_program: *token_program,
        mint: None,
        amount: None,
    };
    if let UiAccountData::Json(parsed_account) = &keyed_account.account.data {
        if parsed_account.program == "spl-token" || parsed_account.program == "spl-token-2022" {
            if let Ok(TokenAccountType::Account(ui_token_account)) =
                serde_json::from_value(parsed_account.parsed.clone())
            {
                raw.mint = ui_token_account.mint.parse::<Pubkey>().ok();
                raw.amount = ui_token_account.token_amount.amount.parse::<u64>().ok();
            }
        }
    }
    Some(raw)
}
