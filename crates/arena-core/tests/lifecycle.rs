//! End-to-end lifecycle tests for the arena engine.
//!
//! These drive [`Arena`] the way the HTTP layer does: join, look up, move,
//! delete. Tokio time is paused so the inter-round delay is virtual, and a
//! [`ManualClock`] controls queue freshness and series retention.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use arena_core::clock::{Clock, ManualClock};
use arena_core::config::{ArenaConfig, DuplicateJoinPolicy};
use arena_core::error::{ArenaError, MoveRejection};
use arena_core::Arena;
use arena_types::{
    Cell, FindResponse, JoinResponse, Mark, Outcome, PlayerId, Score, SeriesId, SeriesView,
};

const TOP_ROW_WIN: [i32; 5] = [0, 3, 1, 4, 2];
const FULL_BOARD_DRAW: [i32; 9] = [0, 1, 2, 4, 3, 5, 7, 6, 8];

struct Pairing {
    lobby_id: SeriesId,
    x: PlayerId,
    o: PlayerId,
}

fn arena_with(config: &ArenaConfig) -> (Arc<Arena>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let arena = Arc::new(Arena::with_clock(
        config,
        Arc::clone(&clock) as Arc<dyn Clock>,
    ));
    (arena, clock)
}

fn arena() -> (Arc<Arena>, Arc<ManualClock>) {
    arena_with(&ArenaConfig::default())
}

async fn pair(arena: &Arena, a: &str, b: &str) -> Pairing {
    let first = arena.join_matchmaking(a).await.unwrap();
    let JoinResponse::Waiting { player_id: x, .. } = first else {
        panic!("first join should wait, got {first:?}");
    };
    let second = arena.join_matchmaking(b).await.unwrap();
    let JoinResponse::Found {
        player_id: o,
        lobby_id,
        ..
    } = second
    else {
        panic!("second join should pair, got {second:?}");
    };
    Pairing { lobby_id, x, o }
}

async fn play(arena: &Arena, p: &Pairing, cells: &[i32]) -> arena_types::MoveResponse {
    let mut last = None;
    for &cell in cells {
        let view = arena.get_series(p.lobby_id).await.unwrap();
        let turn = view.current().unwrap().current_turn;
        last = Some(arena.apply_move(p.lobby_id, turn, cell).await.unwrap());
    }
    last.expect("at least one move")
}

async fn view(arena: &Arena, p: &Pairing) -> SeriesView {
    arena.get_series(p.lobby_id).await.unwrap()
}

// =========================================================================
// Matchmaking
// =========================================================================

#[tokio::test]
async fn ann_and_bob_are_paired_with_crossed_opponents() {
    let (arena, _clock) = arena();

    let ann = arena.join_matchmaking("Ann").await.unwrap();
    let JoinResponse::Waiting {
        player_id: ann_id,
        players_in_queue,
    } = ann
    else {
        panic!("Ann should wait, got {ann:?}");
    };
    assert_eq!(players_in_queue, 1);

    let bob = arena.join_matchmaking("Bob").await.unwrap();
    let JoinResponse::Found {
        player_id: bob_id,
        lobby_id,
        opponent,
        you_are,
    } = bob
    else {
        panic!("Bob should be paired, got {bob:?}");
    };
    assert_eq!(you_are, Mark::O);
    assert_eq!(opponent, "Ann");

    // Ann learns her seat by looking herself up.
    let found = arena.find_by_name("Ann").await;
    assert_eq!(
        found,
        FindResponse::Found {
            lobby_id,
            opponent: "Bob".to_owned(),
            you_are: Mark::X,
            player_id: ann_id,
        }
    );

    let series = arena.get_series(lobby_id).await.unwrap();
    assert_eq!(series.player1, ann_id);
    assert_eq!(series.player2, bob_id);
    assert_eq!(series.current().map(|g| g.current_turn), Some(ann_id));
    assert_eq!(series.score, Score::default());
}

#[tokio::test]
async fn duplicate_join_is_rejected_by_default() {
    let (arena, _clock) = arena();
    let _ = arena.join_matchmaking("Ann").await.unwrap();

    let again = arena.join_matchmaking("Ann").await;
    assert_eq!(
        again,
        Err(ArenaError::AlreadyQueued {
            username: "Ann".to_owned()
        })
    );
    assert_eq!(arena.health_snapshot().await.players_in_queue, 1);
}

#[tokio::test]
async fn duplicate_join_reports_waiting_under_merge_policy() {
    let mut config = ArenaConfig::default();
    config.matchmaking.duplicate_join = DuplicateJoinPolicy::Merge;
    let (arena, _clock) = arena_with(&config);

    let _ = arena.join_matchmaking("Ann").await.unwrap();
    let again = arena.join_matchmaking("Ann").await.unwrap();
    assert!(matches!(
        again,
        JoinResponse::Waiting {
            players_in_queue: 1,
            ..
        }
    ));
}

#[tokio::test]
async fn stale_waiter_is_not_paired() {
    let (arena, clock) = arena();
    let _ = arena.join_matchmaking("Ann").await.unwrap();

    clock.advance_secs(30);
    let bob = arena.join_matchmaking("Bob").await.unwrap();
    assert!(matches!(
        bob,
        JoinResponse::Waiting {
            players_in_queue: 1,
            ..
        }
    ));
    assert_eq!(arena.find_by_name("Ann").await, FindResponse::NotFound);
    assert_eq!(
        arena.find_by_name("Bob").await,
        FindResponse::Waiting {
            players_in_queue: 1
        }
    );
}

#[tokio::test]
async fn unknown_name_is_not_found() {
    let (arena, _clock) = arena();
    assert_eq!(arena.find_by_name("Nobody").await, FindResponse::NotFound);
}

// =========================================================================
// Moves
// =========================================================================

#[tokio::test(start_paused = true)]
async fn top_row_win_scores_and_reports_line() {
    let (arena, _clock) = arena();
    let p = pair(&arena, "Ann", "Bob").await;

    let result = play(&arena, &p, &TOP_ROW_WIN).await;
    assert_eq!(result.winner, Some(Outcome::WinX));
    assert!(result.game_ended);
    assert_eq!(result.final_score, Score { x: 1, o: 0 });
    assert_eq!(result.winning_line, Some([0, 1, 2]));
    assert_eq!(result.new_game_in_ms, Some(2_000));
    assert!(!result.series_complete);

    let series = view(&arena, &p).await;
    assert_eq!(series.winning_line, Some([0, 1, 2]));
    assert_eq!(series.current().and_then(|g| g.winner), Some(Outcome::WinX));
}

#[tokio::test(start_paused = true)]
async fn full_board_is_a_draw_without_score() {
    let (arena, _clock) = arena();
    let p = pair(&arena, "Ann", "Bob").await;

    let result = play(&arena, &p, &FULL_BOARD_DRAW).await;
    assert_eq!(result.winner, Some(Outcome::Draw));
    assert_eq!(result.final_score, Score::default());
    assert_eq!(result.winning_line, None);
    assert!(result.board.iter().all(|c| *c != Cell::Empty));
    // Draws advance under the default policy.
    assert_eq!(result.new_game_in_ms, Some(2_000));
}

#[tokio::test]
async fn wrong_turn_is_rejected_and_board_unchanged() {
    let (arena, _clock) = arena();
    let p = pair(&arena, "Ann", "Bob").await;
    let before = view(&arena, &p).await;

    let result = arena.apply_move(p.lobby_id, p.o, 4).await;
    assert_eq!(result, Err(ArenaError::NotYourTurn { player_id: p.o }));
    assert_eq!(view(&arena, &p).await, before);
}

#[tokio::test]
async fn occupied_and_out_of_range_cells_are_rejected() {
    let (arena, _clock) = arena();
    let p = pair(&arena, "Ann", "Bob").await;
    let _ = arena.apply_move(p.lobby_id, p.x, 4).await.unwrap();
    let before = view(&arena, &p).await;

    assert_eq!(
        arena.apply_move(p.lobby_id, p.o, 4).await,
        Err(ArenaError::IllegalMove {
            cell: 4,
            reason: MoveRejection::Occupied,
        })
    );
    assert_eq!(
        arena.apply_move(p.lobby_id, p.o, 9).await,
        Err(ArenaError::IllegalMove {
            cell: 9,
            reason: MoveRejection::OutOfRange,
        })
    );
    assert_eq!(view(&arena, &p).await, before);
}

#[tokio::test]
async fn turns_alternate_strictly() {
    let (arena, _clock) = arena();
    let p = pair(&arena, "Ann", "Bob").await;

    let mut expected = p.x;
    for cell in [4, 0, 8, 2] {
        let result = arena.apply_move(p.lobby_id, expected, cell).await.unwrap();
        expected = if expected == p.x { p.o } else { p.x };
        assert_eq!(result.current_turn, expected);
    }
}

#[tokio::test]
async fn move_on_unknown_series_is_not_found() {
    let (arena, _clock) = arena();
    let id = SeriesId::new();
    assert_eq!(
        arena.apply_move(id, PlayerId::new(), 0).await,
        Err(ArenaError::NotFound(id))
    );
    assert_eq!(arena.get_series(id).await, Err(ArenaError::NotFound(id)));
}

// =========================================================================
// Rounds
// =========================================================================

#[tokio::test(start_paused = true)]
async fn concluded_round_blocks_moves_until_next_round_opens() {
    let (arena, _clock) = arena();
    let p = pair(&arena, "Ann", "Bob").await;
    let _ = play(&arena, &p, &TOP_ROW_WIN).await;

    assert_eq!(
        arena.apply_move(p.lobby_id, p.o, 8).await,
        Err(ArenaError::MatchAlreadyConcluded {
            lobby_id: p.lobby_id,
            round: 0,
        })
    );

    tokio::time::sleep(Duration::from_millis(2_001)).await;

    let series = view(&arena, &p).await;
    assert_eq!(series.current_game, 1);
    assert_eq!(series.games.len(), 2);
    assert_eq!(series.winning_line, None);
    let round = series.current().unwrap();
    assert_eq!(round.current_turn, p.x);
    assert_eq!(round.winner, None);
    assert!(round.board.iter().all(|c| *c == Cell::Empty));
}

#[tokio::test(start_paused = true)]
async fn series_caps_at_five_rounds() {
    let (arena, _clock) = arena();
    let p = pair(&arena, "Ann", "Bob").await;

    for round in 0..5 {
        let result = play(&arena, &p, &TOP_ROW_WIN).await;
        let last = round == 4;
        assert_eq!(result.series_complete, last, "round {round}");
        assert_eq!(result.new_game_in_ms.is_some(), !last, "round {round}");
        tokio::time::sleep(Duration::from_millis(2_001)).await;
    }

    // Long after the final round nothing else is appended.
    tokio::time::sleep(Duration::from_secs(10)).await;
    let series = view(&arena, &p).await;
    assert_eq!(series.games.len(), 5);
    assert_eq!(series.current_game, 4);
    assert_eq!(series.score, Score { x: 5, o: 0 });
    assert!(series.series_complete);
    assert!(!arena.scheduler().is_pending(p.lobby_id));

    assert_eq!(
        arena.apply_move(p.lobby_id, p.o, 8).await,
        Err(ArenaError::SeriesComplete(p.lobby_id))
    );
}

#[tokio::test(start_paused = true)]
async fn draw_does_not_advance_when_disabled() {
    let mut config = ArenaConfig::default();
    config.series.draws_advance = false;
    let (arena, _clock) = arena_with(&config);
    let p = pair(&arena, "Ann", "Bob").await;

    let result = play(&arena, &p, &FULL_BOARD_DRAW).await;
    assert_eq!(result.new_game_in_ms, None);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(view(&arena, &p).await.games.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn deleting_before_advance_keeps_series_gone() {
    let (arena, _clock) = arena();
    let p = pair(&arena, "Ann", "Bob").await;
    let _ = play(&arena, &p, &TOP_ROW_WIN).await;
    assert!(arena.scheduler().is_pending(p.lobby_id));

    arena.delete_series(p.lobby_id).await.unwrap();
    assert!(!arena.scheduler().is_pending(p.lobby_id));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(
        arena.get_series(p.lobby_id).await,
        Err(ArenaError::NotFound(p.lobby_id))
    );
    assert_eq!(
        arena.delete_series(p.lobby_id).await,
        Err(ArenaError::NotFound(p.lobby_id))
    );
}

// =========================================================================
// Retention
// =========================================================================

#[tokio::test]
async fn series_survives_299_seconds_and_is_gone_at_301() {
    let (arena, clock) = arena();
    let p = pair(&arena, "Ann", "Bob").await;

    clock.advance_secs(299);
    assert!(arena.get_series(p.lobby_id).await.is_ok());

    clock.advance_secs(2);
    let health = arena.health_snapshot().await;
    assert_eq!(health.active_lobbies, 0);
    assert_eq!(
        arena.get_series(p.lobby_id).await,
        Err(ArenaError::NotFound(p.lobby_id))
    );
}

#[tokio::test]
async fn access_does_not_refresh_retention() {
    let (arena, clock) = arena();
    let p = pair(&arena, "Ann", "Bob").await;

    for _ in 0..3 {
        clock.advance_secs(100);
        let _ = arena.get_series(p.lobby_id).await;
    }
    clock.advance_secs(1);
    assert_eq!(arena.sweep().await, 1);
}

#[tokio::test(start_paused = true)]
async fn eviction_cancels_pending_advance() {
    let (arena, clock) = arena();
    let p = pair(&arena, "Ann", "Bob").await;
    let _ = play(&arena, &p, &TOP_ROW_WIN).await;

    clock.advance_secs(301);
    assert_eq!(arena.sweep().await, 1);
    assert!(!arena.scheduler().is_pending(p.lobby_id));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(arena.registry().is_empty().await);
}

#[tokio::test]
async fn health_reports_counts() {
    let (arena, _clock) = arena();
    let _ = pair(&arena, "Ann", "Bob").await;
    let _ = arena.join_matchmaking("Cid").await.unwrap();

    let health = arena.health_snapshot().await;
    assert_eq!(health.status, "alive");
    assert_eq!(health.active_lobbies, 1);
    assert_eq!(health.players_in_queue, 1);

    let json = serde_json::to_value(&health).unwrap();
    assert_eq!(json["active_lobbies"], 1);
}

// =========================================================================
// Concurrency
// =========================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_joins_pair_everyone_exactly_once() {
    const PLAYERS: usize = 64;
    let arena = Arc::new(Arena::new(&ArenaConfig::default()));

    let joins: Vec<_> = (0..PLAYERS)
        .map(|i| {
            let arena = Arc::clone(&arena);
            tokio::spawn(async move { arena.join_matchmaking(&format!("player-{i}")).await })
        })
        .collect();

    let mut found = Vec::new();
    for join in joins {
        if let JoinResponse::Found { lobby_id, .. } = join.await.unwrap().unwrap() {
            found.push(lobby_id);
        }
    }

    assert_eq!(found.len(), PLAYERS / 2);
    let mut distinct = found.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), PLAYERS / 2, "a lobby was reported twice");

    let health = arena.health_snapshot().await;
    assert_eq!(health.active_lobbies, PLAYERS / 2);
    assert_eq!(health.players_in_queue, 0);

    let mut seats: HashMap<SeriesId, Vec<Mark>> = HashMap::new();
    for i in 0..PLAYERS {
        let FindResponse::Found {
            lobby_id, you_are, ..
        } = arena.find_by_name(&format!("player-{i}")).await
        else {
            panic!("player-{i} was not seated");
        };
        seats.entry(lobby_id).or_default().push(you_are);
    }
    assert_eq!(seats.len(), PLAYERS / 2);
    for marks in seats.values_mut() {
        marks.sort();
        assert_eq!(marks.as_slice(), [Mark::X, Mark::O]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn moves_racing_the_round_advance_land_once() {
    let mut config = ArenaConfig::default();
    config.series.next_round_delay_ms = 20;
    let arena = Arc::new(Arena::new(&config));
    let p = pair(&arena, "Ann", "Bob").await;
    let _ = play(&arena, &p, &TOP_ROW_WIN).await;

    // Each contender retries while the round is concluded and stops at the
    // first answer from the next round.
    let contenders: Vec<_> = (0..4)
        .map(|_| {
            let arena = Arc::clone(&arena);
            let (lobby_id, x) = (p.lobby_id, p.x);
            tokio::spawn(async move {
                loop {
                    match arena.apply_move(lobby_id, x, 4).await {
                        Err(ArenaError::MatchAlreadyConcluded { .. }) => {
                            tokio::task::yield_now().await;
                        }
                        Ok(report) => return Some(report),
                        Err(_) => return None,
                    }
                }
            })
        })
        .collect();

    let outcomes = tokio::time::timeout(Duration::from_secs(5), async {
        let mut outcomes = Vec::new();
        for contender in contenders {
            outcomes.push(contender.await.unwrap());
        }
        outcomes
    })
    .await
    .expect("the next round should open");

    assert_eq!(outcomes.iter().flatten().count(), 1, "{outcomes:?}");

    let series = view(&arena, &p).await;
    assert_eq!(series.games.len(), 2);
    assert_eq!(series.current_game, 1);
    let first = series.games.first().unwrap();
    assert_eq!(first.winner, Some(Outcome::WinX));
    assert_eq!(first.board.first(), Some(&Cell::X));
    let round = series.current().unwrap();
    assert_eq!(round.board.get(4), Some(&Cell::X));
    assert_eq!(round.board.iter().filter(|c| **c != Cell::Empty).count(), 1);
    assert_eq!(round.current_turn, p.o);
}
