// Copyright (c) 2022 MASSA LABS <info@massa.net>

use super::tools::{open_poll, poll_test, voter};
use crate::start_refresh_task;
use ballot_poll_exports::ViewKind;
use ballot_session_exports::CallError;
use ballot_time::BallotTime;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_refresh_ticks_until_stopped() {
    let t = poll_test(voter(), ViewKind::Voter).await;
    t.chain.add_poll(open_poll("Lunch", &["Pizza", "Sushi"]));
    let mut refresh = start_refresh_task(t.polls.clone(), BallotTime::from_secs(30));

    sleep(Duration::from_secs(29)).await;
    assert_eq!(t.chain.call_count("getPollsCount"), 0);
    assert!(t.polls.polls().is_empty());

    sleep(Duration::from_secs(2)).await;
    assert_eq!(t.chain.call_count("getPollsCount"), 1);
    assert_eq!(t.polls.polls().len(), 1);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(t.chain.call_count("getPollsCount"), 3);

    refresh.stop();
    refresh.stop();
    sleep(Duration::from_secs(120)).await;
    assert_eq!(t.chain.call_count("getPollsCount"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_survives_failures_and_stops_on_drop() {
    let t = poll_test(voter(), ViewKind::Voter).await;
    t.chain.add_poll(open_poll("Lunch", &["Pizza", "Sushi"]));
    t.chain
        .fail_next("getPollsCount", CallError::new("connection reset"));
    let refresh = start_refresh_task(t.polls.clone(), BallotTime::from_secs(30));

    sleep(Duration::from_secs(31)).await;
    assert!(t.polls.polls().is_empty());
    sleep(Duration::from_secs(30)).await;
    assert_eq!(t.polls.polls().len(), 1);

    drop(refresh);
    sleep(Duration::from_secs(300)).await;
    assert_eq!(t.chain.call_count("getPollsCount"), 2);
}
