use crate::manager::GameState;

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};

/// Whatever shows the game to its players and collects their answers.
///
/// The engine calls [`Frontend::display`] with a fresh snapshot right before every
/// [`Frontend::read_line`], and waits for exactly one answer per request.
pub trait Frontend {
    fn display(&mut self, state: &GameState);

    /// Blocks until the next answer is available.
    ///
    /// Returns `None` once no answer can ever come anymore, which stops the game.
    fn read_line(&mut self) -> Option<String>;
}

/// Hands answers over to a [`ChannelFrontend`], possibly from another thread.
#[derive(Clone, Debug)]
pub struct InputSender {
    sender: Sender<String>,
}

impl InputSender {
    /// Queues an answer. Answers are consumed strictly in the order they were sent.
    ///
    /// Returns `false` if the game is gone.
    pub fn send(&self, answer: impl Into<String>) -> bool {
        self.sender.send(answer.into()).is_ok()
    }
}

/// A [`Frontend`] reading answers from a channel, and publishing snapshots through a callback.
///
/// The game blocks on the channel while a choice is pending. Dropping every [`InputSender`] closes it.
pub struct ChannelFrontend<P> {
    receiver: Receiver<String>,
    publisher: P,
}

/// Creates a connected pair of [`InputSender`] and [`ChannelFrontend`].
///
/// # Example
/// ```
/// use rails_and_sails::interaction::{channel, Frontend};
///
/// let (input, mut frontend) = channel(|_state| {});
/// assert!(input.send("WAGON"));
/// assert_eq!(frontend.read_line().as_deref(), Some("WAGON"));
///
/// drop(input);
/// assert_eq!(frontend.read_line(), None);
/// ```
pub fn channel<P>(publisher: P) -> (InputSender, ChannelFrontend<P>)
where
    P: FnMut(&GameState),
{
    let (sender, receiver) = mpsc::channel();

    (
        InputSender { sender },
        ChannelFrontend {
            receiver,
            publisher,
        },
    )
}

impl<P> Frontend for ChannelFrontend<P>
where
    P: FnMut(&GameState),
{
    fn display(&mut self, state: &GameState) {
        (self.publisher)(state);
    }

    fn read_line(&mut self) -> Option<String> {
        self.receiver.recv().ok()
    }
}

/// A [`Frontend`] replaying a fixed list of answers, and keeping track of what was asked.
///
/// Once the answers run out, the input is closed.
#[derive(Debug, Default)]
pub struct ScriptedFrontend {
    answers: VecDeque<String>,
    instructions: Vec<String>,
}

impl ScriptedFrontend {
    pub fn new<S: Into<String>>(answers: impl IntoIterator<Item = S>) -> Self {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            instructions: Vec::new(),
        }
    }

    /// Every instruction displayed so far, one per request (re-prompts included).
    pub fn instructions(&self) -> &[String] {
        &self.instructions
    }

    /// How many answers were not consumed.
    pub fn remaining_answers(&self) -> usize {
        self.answers.len()
    }
}

impl Frontend for ScriptedFrontend {
    fn display(&mut self, state: &GameState) {
        self.instructions.push(state.instruction.to_owned());
    }

    fn read_line(&mut self) -> Option<String> {
        self.answers.pop_front()
    }
}
