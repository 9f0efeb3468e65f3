use platformer::config::VOICE_QUEUE_CAPACITY;
use platformer::input::FrameInput;
use platformer::level;
use platformer::player::Player;
use platformer::session::Session;
use platformer::view::{PlayerNameView, Transition, View, ViewKind};
use platformer::voice::{self, recognizer::forward_phrases};
use std::io::Cursor;
use std::time::Duration;

#[test]
fn recognized_phrases_name_the_player_and_start() {
    let (tx, rx) = voice::channel(VOICE_QUEUE_CAPACITY);
    let mut session = Session::new(
        Player::default(),
        rx,
        "unused.json",
        level::builtin().unwrap(),
    )
    .unwrap();

    let output = Cursor::new("set name: Ada Lovelace\n\nstart\n");
    forward_phrases(output, tx).unwrap().join().unwrap();
    assert_eq!(session.voice.len(), 2);

    let mut view = View::PlayerName(PlayerNameView::new(&mut session));
    let input = FrameInput::default();
    let frame = Duration::from_millis(16);

    assert!(matches!(
        view.update(&mut session, &input, frame),
        Transition::Stay
    ));

    let Transition::To(next) = view.update(&mut session, &input, frame) else {
        panic!("voice start did not leave the name screen");
    };
    assert_eq!(next.kind(), ViewKind::Platform);
    assert_eq!(session.player.name, "Ada Lovelace");
}
