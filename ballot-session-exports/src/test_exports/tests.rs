// Copyright (c) 2022 MASSA LABS <info@massa.net>

use super::*;
use crate::{CallError, VotingContract, WalletEvent, WalletProvider, WhitelistContract};
use ballot_models::poll::NewPoll;
use ballot_time::BallotTime;

fn new_poll(start: u64) -> NewPoll {
    NewPoll {
        title: "Lunch".into(),
        description: "Where do we eat".into(),
        start_time: BallotTime::from_secs(start),
        duration: BallotTime::from_secs(3600),
        options: vec!["Pizza".into(), "Sushi".into()],
    }
}

#[tokio::test]
async fn test_owner_creates_and_non_owner_reverts() {
    let owner = test_address(1);
    let chain = InMemoryChain::new(owner);
    chain.set_now(BallotTime::from_secs(1_000));

    let voting = chain.voting_contract(chain.voting_address(), Some(owner));
    voting.create_poll(new_poll(2_000)).await.unwrap();
    assert_eq!(voting.get_polls_count().await.unwrap(), 1);
    let info = voting.get_poll_info(0).await.unwrap();
    assert_eq!(info.end_time, BallotTime::from_secs(5_600));
    assert!(info.is_active);

    let other = chain.voting_contract(chain.voting_address(), Some(test_address(2)));
    let err = other.create_poll(new_poll(2_000)).await.unwrap_err();
    assert_eq!(err.user_message(), "Only admin can perform this action");

    let err = voting.create_poll(new_poll(500)).await.unwrap_err();
    assert_eq!(err.user_message(), "Start time must be in the future");
}

#[tokio::test]
async fn test_vote_rules() {
    let owner = test_address(1);
    let voter = test_address(2);
    let chain = InMemoryChain::new(owner);
    chain.set_now(BallotTime::from_secs(1_000));
    let admin = chain.voting_contract(chain.voting_address(), Some(owner));
    admin.create_poll(new_poll(2_000)).await.unwrap();

    let as_voter = chain.voting_contract(chain.voting_address(), Some(voter));
    let err = as_voter.vote(0, 0).await.unwrap_err();
    assert_eq!(err.user_message(), "Not whitelisted");

    chain.whitelist(voter);
    let err = as_voter.vote(0, 0).await.unwrap_err();
    assert_eq!(err.user_message(), "Poll is not active");

    chain.set_now(BallotTime::from_secs(2_500));
    assert_eq!(
        as_voter.vote(0, 5).await.unwrap_err().user_message(),
        "Invalid option"
    );
    as_voter.vote(0, 1).await.unwrap();
    assert!(as_voter.has_voted(0, voter).await.unwrap());
    assert_eq!(as_voter.get_poll_results(0).await.unwrap(), vec![0, 1]);
    assert_eq!(
        as_voter.vote(0, 1).await.unwrap_err().user_message(),
        "Already voted"
    );
    assert_eq!(
        as_voter.vote(7, 0).await.unwrap_err().user_message(),
        "Poll does not exist"
    );
}

#[tokio::test]
async fn test_read_only_handle_and_injected_failure() {
    let owner = test_address(1);
    let chain = InMemoryChain::new(owner);
    let reader = chain.whitelist_contract(chain.whitelist_address(), None);
    assert_eq!(
        reader.add_to_whitelist(test_address(3)).await.unwrap_err(),
        CallError::no_signer()
    );
    assert_eq!(reader.owner().await.unwrap(), owner);

    chain.fail_next("owner", CallError::new("connection reset"));
    assert_eq!(
        reader.owner().await.unwrap_err().to_string(),
        "connection reset"
    );
    assert_eq!(reader.owner().await.unwrap(), owner);
    assert_eq!(chain.call_count("owner"), 3);
}

#[tokio::test]
async fn test_switching_notifies_subscribers() {
    let chain = InMemoryChain::new(test_address(1));
    let mut events = chain.subscribe();
    chain.switch_accounts(vec![test_address(4)]);
    chain.switch_chain(5);
    assert_eq!(
        events.recv().await.unwrap(),
        WalletEvent::AccountsChanged(vec![test_address(4)])
    );
    assert_eq!(events.recv().await.unwrap(), WalletEvent::ChainChanged(5));
    assert_eq!(
        chain.request_accounts().await.unwrap(),
        vec![test_address(4)]
    );
}
