// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::persist::persist_contracts;
use anyhow::{bail, Context, Result};
use ballot_models::address::Address;
use ballot_models::tx::TxReceipt;
use ballot_sdk::abi::Token;
use ballot_sdk::{deploy_contract, load_bytecode, RpcClient, RpcWhitelist};
use ballot_session_exports::WhitelistContract;
use console::style;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub(crate) const ADMIN_HINT: &str = "Transaction reverted. Make sure you're using the admin account.";

/// Addresses of a fresh deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Deployment {
    pub deployer: Address,
    pub whitelist: Address,
    pub voting: Address,
}

pub(crate) struct DeployArgs {
    pub whitelist_bytecode: PathBuf,
    pub voting_bytecode: PathBuf,
    pub persist: Option<PathBuf>,
    pub from: Option<Address>,
}

/// What the whitelist script did
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WhitelistOutcome {
    AlreadyWhitelisted,
    Added(TxReceipt),
}

fn read_bytecode(path: &Path) -> Result<Vec<u8>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    load_bytecode(&contents).with_context(|| format!("invalid bytecode in {}", path.display()))
}

/// `--from` or the first account of the node
pub(crate) async fn pick_account(rpc: &RpcClient, from: Option<Address>) -> Result<Address> {
    if let Some(account) = from {
        return Ok(account);
    }
    let accounts = rpc.accounts().await?;
    match accounts.first() {
        Some(account) => Ok(*account),
        None => bail!("the node exposes no account, use --from"),
    }
}

/// Deploy Whitelist, then Voting bound to it, then whitelist the deployer
pub(crate) async fn deploy(rpc: Arc<RpcClient>, args: DeployArgs) -> Result<Deployment> {
    let whitelist_code = read_bytecode(&args.whitelist_bytecode)?;
    let voting_code = read_bytecode(&args.voting_bytecode)?;
    let deployer = pick_account(&rpc, args.from).await?;
    println!("Deploying contracts with the account: {}", deployer);

    let receipt = deploy_contract(&rpc, deployer, &whitelist_code, &[]).await?;
    let whitelist = receipt
        .contract_address
        .context("no whitelist address in the receipt")?;
    println!("Whitelist contract deployed to: {}", style(whitelist).green());

    let receipt =
        deploy_contract(&rpc, deployer, &voting_code, &[Token::Address(whitelist)]).await?;
    let voting = receipt
        .contract_address
        .context("no voting address in the receipt")?;
    println!("Voting contract deployed to: {}", style(voting).green());

    let handle = RpcWhitelist::new(rpc, whitelist, Some(deployer));
    let receipt = handle
        .add_to_whitelist(deployer)
        .await
        .context("could not whitelist the deployer")?;
    debug!("deployer whitelisted in {}", receipt);
    println!("Deployer address whitelisted");

    if let Some(path) = &args.persist {
        persist_contracts(path, whitelist, voting)?;
        info!("contract addresses written to {}", path.display());
        println!("Contract addresses saved to {}", path.display());
    }
    Ok(Deployment {
        deployer,
        whitelist,
        voting,
    })
}

/// Whitelist `account` unless it already is.
/// `contract` must be signed by the whitelist owner.
pub(crate) async fn whitelist(
    contract: &dyn WhitelistContract,
    account: Address,
) -> Result<WhitelistOutcome> {
    if contract.is_whitelisted(account).await? {
        return Ok(WhitelistOutcome::AlreadyWhitelisted);
    }
    match contract.add_whitelisted(account).await {
        Ok(receipt) => Ok(WhitelistOutcome::Added(receipt)),
        Err(err) if err.is_revert() => Err(anyhow::Error::new(err).context(ADMIN_HINT)),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn print_whitelist_outcome(account: Address, outcome: &WhitelistOutcome) {
    match outcome {
        WhitelistOutcome::AlreadyWhitelisted => {
            println!("Address {} is already whitelisted", account)
        }
        WhitelistOutcome::Added(receipt) => {
            println!("Address {} whitelisted", style(account).green());
            println!("Transaction hash: {}", receipt.hash);
            match receipt.block_number {
                Some(block) => println!("Block number: {}", block),
                None => println!("Block number: pending"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_session_exports::test_exports::{test_address, InMemoryChain};
    use ballot_session_exports::{CallError, MockWhitelistContract, WalletProvider};

    #[tokio::test]
    async fn test_owner_whitelists_a_voter() {
        let owner = test_address(1);
        let voter = test_address(2);
        let chain = InMemoryChain::new(owner);
        let contract = chain.whitelist_contract(chain.whitelist_address(), Some(owner));

        let outcome = whitelist(contract.as_ref(), voter).await.unwrap();

        match outcome {
            WhitelistOutcome::Added(receipt) => {
                assert_eq!(receipt.block_number, Some(chain.block_number()))
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(contract.is_whitelisted(voter).await.unwrap());
        assert_eq!(chain.call_count("addWhitelisted"), 1);
    }

    #[tokio::test]
    async fn test_already_whitelisted_is_skipped() {
        let owner = test_address(1);
        let voter = test_address(2);
        let chain = InMemoryChain::new(owner);
        chain.whitelist(voter);
        let contract = chain.whitelist_contract(chain.whitelist_address(), Some(owner));

        let outcome = whitelist(contract.as_ref(), voter).await.unwrap();

        assert_eq!(outcome, WhitelistOutcome::AlreadyWhitelisted);
        assert_eq!(chain.call_count("addWhitelisted"), 0);
    }

    #[tokio::test]
    async fn test_revert_gives_the_admin_hint() {
        let owner = test_address(1);
        let stranger = test_address(3);
        let voter = test_address(2);
        let chain = InMemoryChain::new(owner);
        let contract = chain.whitelist_contract(chain.whitelist_address(), Some(stranger));

        let err = whitelist(contract.as_ref(), voter).await.unwrap_err();

        assert_eq!(err.to_string(), ADMIN_HINT);
        assert!(format!("{:#}", err).contains("Ownable: caller is not the owner"));
        assert!(!contract.is_whitelisted(voter).await.unwrap());
    }

    #[tokio::test]
    async fn test_revert_without_reason_gives_the_admin_hint() {
        let mut contract = MockWhitelistContract::new();
        contract.expect_is_whitelisted().returning(|_| Ok(false));
        contract.expect_add_whitelisted().times(1).returning(|_| {
            Err(CallError::with_data(
                "execution reverted",
                Some(&[0x11, 0x8c, 0xda, 0xa7]),
            ))
        });

        let err = whitelist(&contract, test_address(2)).await.unwrap_err();

        assert_eq!(err.to_string(), ADMIN_HINT);
    }

    #[tokio::test]
    async fn test_rpc_failure_is_not_a_revert() {
        let mut contract = MockWhitelistContract::new();
        contract.expect_is_whitelisted().returning(|_| Ok(false));
        contract
            .expect_add_whitelisted()
            .returning(|_| Err(CallError::new("connection refused")));

        let err = whitelist(&contract, test_address(2)).await.unwrap_err();

        assert_eq!(err.to_string(), "connection refused");
    }
}
