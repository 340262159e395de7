// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Contract handles over JSON-RPC.

use crate::abi::{encode_call, AbiReader, Token};
use crate::rpc::RpcClient;
use async_trait::async_trait;
use ballot_models::address::Address;
use ballot_models::poll::{NewPoll, PollId, PollInfo};
use ballot_models::tx::TxReceipt;
use ballot_session_exports::{CallError, CallResult, VotingContract, WhitelistContract};
use ballot_time::BallotTime;
use std::sync::Arc;

/// Address, node and optional signer shared by both contracts
struct Binding {
    rpc: Arc<RpcClient>,
    address: Address,
    signer: Option<Address>,
}

impl Binding {
    async fn read(&self, signature: &str, args: &[Token]) -> CallResult<Vec<u8>> {
        self.rpc
            .call(self.signer, self.address, &encode_call(signature, args))
            .await
    }

    async fn write(&self, signature: &str, args: &[Token]) -> CallResult<TxReceipt> {
        let signer = self.signer.ok_or_else(CallError::no_signer)?;
        self.rpc
            .transact(signer, Some(self.address), &encode_call(signature, args))
            .await
    }
}

/// `Whitelist` contract
pub struct RpcWhitelist(Binding);

impl RpcWhitelist {
    /// Handle on the contract at `address`, read-only without a signer
    pub fn new(rpc: Arc<RpcClient>, address: Address, signer: Option<Address>) -> Self {
        RpcWhitelist(Binding {
            rpc,
            address,
            signer,
        })
    }
}

#[async_trait]
impl WhitelistContract for RpcWhitelist {
    fn address(&self) -> Address {
        self.0.address
    }

    async fn is_whitelisted(&self, account: Address) -> CallResult<bool> {
        let data = self
            .0
            .read("isWhitelisted(address)", &[Token::Address(account)])
            .await?;
        Ok(AbiReader::new(&data).bool(0)?)
    }

    async fn owner(&self) -> CallResult<Address> {
        let data = self.0.read("owner()", &[]).await?;
        Ok(AbiReader::new(&data).address(0)?)
    }

    async fn get_whitelisted_addresses(&self) -> CallResult<Vec<Address>> {
        let data = self.0.read("getWhitelistedAddresses()", &[]).await?;
        Ok(AbiReader::new(&data).address_array(0)?)
    }

    async fn add_to_whitelist(&self, account: Address) -> CallResult<TxReceipt> {
        self.0
            .write("addToWhitelist(address)", &[Token::Address(account)])
            .await
    }

    async fn add_whitelisted(&self, account: Address) -> CallResult<TxReceipt> {
        self.0
            .write("addWhitelisted(address)", &[Token::Address(account)])
            .await
    }

    async fn remove_from_whitelist(&self, account: Address) -> CallResult<TxReceipt> {
        self.0
            .write("removeFromWhitelist(address)", &[Token::Address(account)])
            .await
    }
}

/// `Voting` contract
pub struct RpcVoting(Binding);

impl RpcVoting {
    /// Handle on the contract at `address`, read-only without a signer
    pub fn new(rpc: Arc<RpcClient>, address: Address, signer: Option<Address>) -> Self {
        RpcVoting(Binding {
            rpc,
            address,
            signer,
        })
    }
}

/// `getPollInfo` returns `(string, string, uint, uint, bool, string[])`
pub(crate) fn decode_poll_info(data: &[u8]) -> CallResult<PollInfo> {
    let reader = AbiReader::new(data);
    Ok(PollInfo {
        title: reader.string(0)?,
        description: reader.string(1)?,
        start_time: BallotTime::from_secs(reader.uint(2)?),
        end_time: BallotTime::from_secs(reader.uint(3)?),
        is_active: reader.bool(4)?,
        options: reader.string_array(5)?,
    })
}

#[async_trait]
impl VotingContract for RpcVoting {
    fn address(&self) -> Address {
        self.0.address
    }

    async fn get_polls_count(&self) -> CallResult<u64> {
        let data = self.0.read("getPollsCount()", &[]).await?;
        Ok(AbiReader::new(&data).uint(0)?)
    }

    async fn get_poll_info(&self, poll_id: PollId) -> CallResult<PollInfo> {
        let data = self
            .0
            .read("getPollInfo(uint256)", &[Token::Uint(poll_id)])
            .await?;
        decode_poll_info(&data)
    }

    async fn get_poll_results(&self, poll_id: PollId) -> CallResult<Vec<u64>> {
        let data = self
            .0
            .read("getPollResults(uint256)", &[Token::Uint(poll_id)])
            .await?;
        Ok(AbiReader::new(&data).uint_array(0)?)
    }

    async fn has_voted(&self, poll_id: PollId, voter: Address) -> CallResult<bool> {
        let data = self
            .0
            .read(
                "hasVoted(uint256,address)",
                &[Token::Uint(poll_id), Token::Address(voter)],
            )
            .await?;
        Ok(AbiReader::new(&data).bool(0)?)
    }

    async fn create_poll(&self, poll: NewPoll) -> CallResult<TxReceipt> {
        self.0
            .write(
                "createPoll(string,string,uint256,uint256,string[])",
                &[
                    Token::String(poll.title),
                    Token::String(poll.description),
                    Token::Uint(poll.start_time.to_secs()),
                    Token::Uint(poll.duration.to_secs()),
                    Token::StringArray(poll.options),
                ],
            )
            .await
    }

    async fn end_poll(&self, poll_id: PollId) -> CallResult<TxReceipt> {
        self.0
            .write("endPoll(uint256)", &[Token::Uint(poll_id)])
            .await
    }

    async fn vote(&self, poll_id: PollId, option_index: u64) -> CallResult<TxReceipt> {
        self.0
            .write(
                "vote(uint256,uint256)",
                &[Token::Uint(poll_id), Token::Uint(option_index)],
            )
            .await
    }
}
