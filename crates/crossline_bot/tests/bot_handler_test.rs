//! Bot handler behavior against a recording messenger.

use crossline_bot::bot::{
    BotHandler, ButtonPress, IncomingMessage, InlineKeyboard, Messenger, TransportError,
};
use crossline_bot::{
    BoardSymbols, ChatId, GameHub, MessageHandle, MessageId, ParticipantId, SessionId,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Message {
        handle: MessageHandle,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Edit {
        handle: MessageHandle,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Answer {
        press: String,
        text: Option<String>,
    },
}

#[derive(Debug, Default)]
struct RecordingMessenger {
    log: Mutex<Vec<Sent>>,
    next: AtomicI64,
    fail_edits: AtomicBool,
}

impl RecordingMessenger {
    fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.log.lock().expect("log lock"))
    }

    fn push(&self, sent: Sent) {
        self.log.lock().expect("log lock").push(sent);
    }
}

#[async_trait::async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<MessageHandle, TransportError> {
        let message = MessageId::from(self.next.fetch_add(1, Ordering::SeqCst) + 100);
        let handle = MessageHandle::new(chat, message);
        self.push(Sent::Message {
            handle,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(handle)
    }

    async fn edit_message(
        &self,
        handle: MessageHandle,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        if self.fail_edits.load(Ordering::SeqCst) {
            return Err(TransportError::new("message is too old to edit"));
        }
        self.push(Sent::Edit {
            handle,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn answer_button(
        &self,
        press: &ButtonPress,
        text: Option<&str>,
    ) -> Result<(), TransportError> {
        self.push(Sent::Answer {
            press: press.id.clone(),
            text: text.map(str::to_string),
        });
        Ok(())
    }
}

fn handler() -> BotHandler<RecordingMessenger> {
    BotHandler::new(
        GameHub::new(),
        RecordingMessenger::default(),
        BoardSymbols::new("X", "O", "."),
    )
}

fn msg(from: &str, chat: i64, text: &str) -> IncomingMessage {
    IncomingMessage::new(ParticipantId::new(from), ChatId::from(chat), text)
}

fn press(from: &str, data: &str) -> ButtonPress {
    ButtonPress::new(format!("{from}-{data}"), ParticipantId::new(from), data)
}

fn labels(keyboard: &Option<InlineKeyboard>) -> String {
    keyboard
        .as_ref()
        .map(|k| k.buttons().map(|b| b.text.as_str()).collect())
        .unwrap_or_default()
}

async fn started_game(handler: &BotHandler<RecordingMessenger>) {
    handler.on_command(&msg("alice", 1, "/newgame")).await;
    handler.on_command(&msg("bob", 2, "/join alice")).await;
    handler.messenger().take();
}

#[tokio::test]
async fn test_start_greets_and_plain_text_is_ignored() {
    let handler = handler();
    handler.on_command(&msg("alice", 1, "hello there")).await;
    assert!(handler.messenger().take().is_empty());

    handler.on_command(&msg("alice", 1, "/start")).await;
    let sent = handler.messenger().take();
    assert!(matches!(
        sent.as_slice(),
        [Sent::Message { text, keyboard: None, .. }] if text.contains("/newgame")
    ));
}

#[tokio::test]
async fn test_newgame_sends_empty_board_and_attaches_handle() {
    let handler = handler();
    handler.on_command(&msg("alice", 1, "/newgame")).await;

    let sent = handler.messenger().take();
    let [Sent::Message { handle, text, keyboard }] = sent.as_slice() else {
        panic!("expected one message, got {sent:?}");
    };
    assert!(text.contains("Game id: alice"));
    assert_eq!(labels(keyboard), ".........");
    let view = handler.hub().view(&SessionId::new("alice")).expect("view");
    assert_eq!(view.handles[0], Some(*handle));
}

#[tokio::test]
async fn test_second_newgame_is_rejected() {
    let handler = handler();
    handler.on_command(&msg("alice", 1, "/newgame")).await;
    handler.messenger().take();

    handler.on_command(&msg("alice", 1, "/newgame")).await;
    let sent = handler.messenger().take();
    assert!(matches!(
        sent.as_slice(),
        [Sent::Message { text, .. }] if text == "You are already in a game!"
    ));
    assert_eq!(handler.hub().active_sessions(), Ok(1));
}

#[tokio::test]
async fn test_join_updates_creator_and_replies_to_joiner() {
    let handler = handler();
    handler.on_command(&msg("alice", 1, "/newgame")).await;
    handler.messenger().take();

    handler.on_command(&msg("bob", 2, "/join alice")).await;
    let sent = handler.messenger().take();
    assert_eq!(sent.len(), 2, "{sent:?}");
    match &sent[0] {
        Sent::Edit { handle, text, .. } => {
            assert_eq!(handle.chat, ChatId::from(1));
            assert!(text.contains("The game has started!"));
            assert!(text.contains("Player 2 (O): bob"));
        }
        other => panic!("expected creator edit, got {other:?}"),
    }
    match &sent[1] {
        Sent::Message { handle, text, .. } => {
            assert_eq!(handle.chat, ChatId::from(2));
            assert!(text.contains("You joined the game!"));
        }
        other => panic!("expected joiner reply, got {other:?}"),
    }

    let view = handler.hub().view(&SessionId::new("alice")).expect("view");
    assert!(view.handles.iter().all(Option::is_some));
}

#[tokio::test]
async fn test_join_without_id_and_unknown_game() {
    let handler = handler();
    handler.on_command(&msg("bob", 2, "/join")).await;
    handler.on_command(&msg("bob", 2, "/join carol")).await;
    handler.on_command(&msg("bob", 2, "/resign")).await;

    let texts: Vec<String> = handler
        .messenger()
        .take()
        .into_iter()
        .filter_map(|s| match s {
            Sent::Message { text, .. } => Some(text),
            _ => None,
        })
        .collect();
    assert_eq!(texts.len(), 3);
    assert!(texts[0].contains("/join <id>"));
    assert_eq!(texts[1], "There is no such game.");
    assert!(texts[2].contains("/resign"));
}

#[tokio::test]
async fn test_move_edits_both_boards() {
    let handler = handler();
    started_game(&handler).await;

    handler.on_button_press(&press("alice", "move_4")).await;
    let sent = handler.messenger().take();
    let edits: Vec<_> = sent
        .iter()
        .filter_map(|s| match s {
            Sent::Edit { handle, text, keyboard } => Some((handle.chat, text, labels(keyboard))),
            _ => None,
        })
        .collect();
    assert_eq!(edits.len(), 2);
    for (_, text, board) in &edits {
        assert_eq!(text.as_str(), "Player bob (O) to move");
        assert_eq!(board, "....X....");
    }
    assert_eq!(
        sent.last(),
        Some(&Sent::Answer {
            press: "alice-move_4".to_string(),
            text: None
        })
    );
}

#[tokio::test]
async fn test_rejected_press_is_answered_without_edits() {
    let handler = handler();
    started_game(&handler).await;

    handler.on_button_press(&press("bob", "move_4")).await;
    handler.on_button_press(&press("carol", "move_4")).await;
    handler.on_button_press(&press("alice", "move_12")).await;
    handler.on_button_press(&press("alice", "resign")).await;

    let answers: Vec<Option<String>> = handler
        .messenger()
        .take()
        .into_iter()
        .map(|s| match s {
            Sent::Answer { text, .. } => text,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        answers,
        vec![
            Some("It's not your turn!".to_string()),
            Some("You are not in a game!".to_string()),
            Some("That cell is not on the board.".to_string()),
            Some("That button does not belong to a game.".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_winning_press_announces_and_ends_game() {
    let handler = handler();
    started_game(&handler).await;

    for (who, cell) in [("alice", 0), ("bob", 3), ("alice", 1), ("bob", 4)] {
        handler.on_button_press(&press(who, &format!("move_{cell}"))).await;
    }
    handler.messenger().take();

    handler.on_button_press(&press("alice", "move_2")).await;
    let sent = handler.messenger().take();
    let winners = sent
        .iter()
        .filter(|s| matches!(s, Sent::Edit { text, .. } if text.starts_with("Player alice (X) wins!")))
        .count();
    assert_eq!(winners, 2);
    assert_eq!(handler.hub().active_sessions(), Ok(0));

    // A stale board button after the game is over.
    handler.on_button_press(&press("bob", "move_8")).await;
    assert_eq!(
        handler.messenger().take(),
        vec![Sent::Answer {
            press: "bob-move_8".to_string(),
            text: Some("You are not in a game!".to_string())
        }]
    );
}

#[tokio::test]
async fn test_edit_failures_do_not_undo_moves() {
    let handler = handler();
    started_game(&handler).await;
    handler.messenger().fail_edits.store(true, Ordering::SeqCst);

    handler.on_button_press(&press("alice", "move_4")).await;

    let view = handler.hub().view(&SessionId::new("alice")).expect("view");
    assert_eq!(view.turn, 1);
    assert_eq!(
        handler.messenger().take(),
        vec![Sent::Answer {
            press: "alice-move_4".to_string(),
            text: None
        }]
    );
}
