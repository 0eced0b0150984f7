use battleship_server::{
    Disposer, DispositionError, FixedDisposer, MatchStatus, Notification, PlayReply, PlayStatus,
    Server, ServerError, SessionHandle, Slot, Tile,
};

fn fleet() -> Vec<battleship_server::ShipSpec> {
    FixedDisposer.dispose()
}

fn status(is_my_turn: bool, status: MatchStatus) -> Notification {
    Notification::GameStatus { is_my_turn, status }
}

/// Every notification queued on `handle` right now.
fn drain(handle: &mut SessionHandle) -> Vec<Notification> {
    std::iter::from_fn(|| handle.try_next_notification()).collect()
}

async fn seated_pair(server: &Server) -> (SessionHandle, SessionHandle) {
    let alice = server.connect("alice", fleet()).await.unwrap();
    let bob = server.connect("bob", fleet()).await.unwrap();
    (alice, bob)
}

#[tokio::test]
async fn second_admission_starts_the_match() {
    let server = Server::new();
    let mut alice = server.connect("alice", fleet()).await.unwrap();
    assert_eq!(alice.id(), 1);
    assert_eq!(alice.slot(), Slot::First);
    assert_eq!(drain(&mut alice), vec![Notification::Admitted { id: 1 }]);
    assert_eq!(server.snapshot().await.turn, None);

    let mut bob = server.connect("bob", fleet()).await.unwrap();
    assert_eq!(bob.id(), 2);
    assert_eq!(bob.slot(), Slot::Second);

    assert_eq!(drain(&mut alice), vec![status(true, MatchStatus::Playing)]);
    assert_eq!(
        drain(&mut bob),
        vec![
            Notification::Admitted { id: 2 },
            status(false, MatchStatus::Playing)
        ]
    );

    let snapshot = server.snapshot().await;
    assert_eq!(snapshot.turn, Some(1));
    assert_eq!(snapshot.plies, 0);
    assert_eq!(snapshot.round, 1);
    assert_eq!(
        snapshot.seated,
        vec![
            (Slot::First, 1, "alice".to_string()),
            (Slot::Second, 2, "bob".to_string())
        ]
    );
}

#[tokio::test]
async fn third_participant_is_turned_away() {
    let server = Server::new();
    let (_alice, _bob) = seated_pair(&server).await;
    let err = server.connect("carol", fleet()).await.unwrap_err();
    assert_eq!(err, ServerError::SessionFull);
    assert_eq!(err.to_string(), "2 clients already connected");
    assert_eq!(server.snapshot().await.seated.len(), 2);
}

#[tokio::test]
async fn refused_fleet_changes_nothing() {
    let server = Server::new();
    let mut ships = fleet();
    ships[1] = ships[0];
    let err = server.connect("cheater", ships).await.unwrap_err();
    assert!(matches!(
        err,
        ServerError::InvalidPlacement(DispositionError::WrongFleet { .. })
    ));
    let err = server.connect("lazy", Vec::new()).await.unwrap_err();
    assert!(matches!(err, ServerError::InvalidPlacement(_)));

    let snapshot = server.snapshot().await;
    assert!(snapshot.seated.is_empty());
    let alice = server.connect("alice", fleet()).await.unwrap();
    assert_eq!(alice.id(), 1);
}

#[tokio::test]
async fn refusals_leave_the_session_untouched() {
    let server = Server::new();
    let (mut alice, mut bob) = seated_pair(&server).await;
    drain(&mut alice);
    drain(&mut bob);
    let before = server.snapshot().await;

    assert_eq!(
        server.play(bob.id(), 81).await.unwrap(),
        PlayReply::refused(PlayStatus::NotYourTurn)
    );
    for position in [-1, 100, i32::MAX] {
        let reply = server.play(alice.id(), position).await.unwrap();
        assert_eq!(reply.status, PlayStatus::InvalidPosition);
        assert_eq!(reply.tile, Tile::Unknown);
    }

    assert_eq!(server.snapshot().await, before);
    assert!(drain(&mut alice).is_empty());
    assert!(drain(&mut bob).is_empty());

    // the refused shot at 81 left alice's patrol boat whole
    server.play(alice.id(), 99).await.unwrap();
    assert_eq!(
        server.play(bob.id(), 80).await.unwrap(),
        PlayReply::accepted(Tile::Ship)
    );
}

#[tokio::test]
async fn unknown_ids_are_errors() {
    let server = Server::new();
    let (_alice, _bob) = seated_pair(&server).await;
    assert_eq!(
        server.play(99, 0).await,
        Err(ServerError::UnknownParticipant(99))
    );
    assert_eq!(
        server.disconnect(99).await,
        Err(ServerError::UnknownParticipant(99))
    );
    assert_eq!(
        server.rearm(99, fleet()).await,
        Err(ServerError::UnknownParticipant(99))
    );
}

#[tokio::test]
async fn accepted_shot_flips_the_turn() {
    let server = Server::new();
    let (mut alice, mut bob) = seated_pair(&server).await;
    drain(&mut alice);
    drain(&mut bob);

    let reply = server.play(alice.id(), 80).await.unwrap();
    assert_eq!(reply, PlayReply::accepted(Tile::Ship));
    assert_eq!(drain(&mut alice), vec![status(false, MatchStatus::Playing)]);
    assert_eq!(drain(&mut bob), vec![status(true, MatchStatus::Playing)]);

    let snapshot = server.snapshot().await;
    assert_eq!(snapshot.turn, Some(bob.id()));
    assert_eq!(snapshot.plies, 1);
    assert_eq!(
        server.play(alice.id(), 81).await.unwrap().status,
        PlayStatus::NotYourTurn
    );
}

#[tokio::test]
async fn full_match_ends_in_victory_and_rearm_starts_the_next() {
    let server = Server::new();
    let (mut alice, mut bob) = seated_pair(&server).await;
    let targets = [
        0, 1, 2, 3, 4, 20, 21, 22, 23, 40, 41, 42, 60, 61, 62, 80, 81,
    ];
    // columns 8 and 9 hold no ship in the fixed layout
    let misses: Vec<i32> = (0..10).map(|r| r * 10 + 9).chain((0..6).map(|r| r * 10 + 8)).collect();

    let mut tiles = Vec::new();
    for (k, &target) in targets.iter().enumerate() {
        let reply = server.play(alice.id(), target).await.unwrap();
        assert_eq!(reply.status, PlayStatus::Accepted);
        tiles.push(reply.tile);
        if let Some(&miss) = misses.get(k) {
            let reply = server.play(bob.id(), miss).await.unwrap();
            assert_eq!(reply, PlayReply::accepted(Tile::Miss));
        }
    }
    assert_eq!(tiles.iter().filter(|t| **t == Tile::Sunk).count(), 5);
    assert_eq!(tiles.last(), Some(&Tile::Sunk));

    assert_eq!(
        drain(&mut alice).last(),
        Some(&status(false, MatchStatus::Victory))
    );
    assert_eq!(
        drain(&mut bob).last(),
        Some(&status(false, MatchStatus::Defeat))
    );

    let snapshot = server.snapshot().await;
    assert_eq!(snapshot.turn, None);
    assert_eq!(snapshot.plies, 33);
    assert_eq!(snapshot.last_winner, Some(alice.id()));
    assert_eq!(
        server.play(alice.id(), 5).await.unwrap().status,
        PlayStatus::NotYourTurn
    );

    server.rearm(bob.id(), fleet()).await.unwrap();
    assert_eq!(server.snapshot().await.turn, None);
    server.rearm(alice.id(), fleet()).await.unwrap();

    let snapshot = server.snapshot().await;
    assert_eq!(snapshot.round, 2);
    assert_eq!(snapshot.plies, 0);
    assert_eq!(snapshot.turn, Some(alice.id()));
    assert_eq!(drain(&mut alice), vec![status(true, MatchStatus::Playing)]);
    assert_eq!(drain(&mut bob), vec![status(false, MatchStatus::Playing)]);

    assert_eq!(
        server.rearm(bob.id(), fleet()).await,
        Err(ServerError::MatchInProgress(bob.id()))
    );
    // the new match starts from a clean board
    assert_eq!(
        server.play(alice.id(), 81).await.unwrap(),
        PlayReply::accepted(Tile::Ship)
    );
}

#[tokio::test]
async fn disconnect_closes_the_handle_and_suspends_the_match() {
    let server = Server::new();
    let (mut alice, mut bob) = seated_pair(&server).await;
    drain(&mut bob);
    server.play(alice.id(), 0).await.unwrap();
    drain(&mut bob);

    server.disconnect(alice.id()).await.unwrap();
    assert!(alice.is_closed());
    alice.closed().await;
    drain(&mut alice);
    assert_eq!(alice.next_notification().await, None);
    assert_eq!(drain(&mut bob), vec![status(false, MatchStatus::Playing)]);

    let snapshot = server.snapshot().await;
    assert_eq!(snapshot.turn, None);
    assert_eq!(snapshot.seated, vec![(Slot::Second, 2, "bob".to_string())]);
    assert_eq!(
        server.play(bob.id(), 0).await.unwrap().status,
        PlayStatus::NotYourTurn
    );

    // the freed seat goes to a newcomer, who opens the next match
    let carol = server.connect("carol", fleet()).await.unwrap();
    assert_eq!(carol.id(), 3);
    assert_eq!(carol.slot(), Slot::First);
    let snapshot = server.snapshot().await;
    assert_eq!(snapshot.turn, Some(3));
    assert_eq!(snapshot.round, 2);
    assert_eq!(drain(&mut bob), vec![status(false, MatchStatus::Playing)]);
}
