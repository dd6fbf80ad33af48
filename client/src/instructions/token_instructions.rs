use anyhow::Result;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, transaction::Transaction};

use crate::scanner::EmptyAccount;

pub fn close_token_account_instr(
    token_program: &Pubkey,
    close_account: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
) -> Result<Instruction> {
    Ok(spl_token_2022::instruction::close_account(
        token_program,
        close_account,
        destination,
        owner,
        &[],
    )?)
}

/// One unsigned transaction closing every account, rent and authority both
/// going to `owner`, who also pays the fee.
pub fn build_close_transaction(owner: &Pubkey, accounts: &[EmptyAccount]) -> Result<Transaction> {
    let instructions = accounts
        .iter()
        .map(|account| {
            close_token_account_instr(&account.token_program, &account.address, owner, owner)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Transaction::new_with_payer(&instructions, Some(owner)))
}
