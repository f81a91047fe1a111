use std::io::{self, IsTerminal, Write};

use async_trait::async_trait;
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::Mutex,
};
use tracing::warn;

use crate::display::{CONFIRM_QUESTION, INVALID_ANSWER};

/// Console the sweep talks to.
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Prints a full line.
    fn say(&self, line: &str);

    /// Prints a question without a trailing newline.
    fn ask(&self, question: &str);

    /// Reads one line of input; `None` at end of input.
    async fn read_line(&self) -> io::Result<Option<String>>;

    fn supports_color(&self) -> bool {
        false
    }
}

/// [`Terminal`] over the process's stdout and stdin.
pub struct StdTerminal {
    stdin: Mutex<Lines<BufReader<Stdin>>>,
    color: bool,
}

impl StdTerminal {
    pub fn new() -> Self {
        Self {
            stdin: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            color: io::stdout().is_terminal(),
        }
    }
}

impl Default for StdTerminal {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Terminal for StdTerminal {
    fn say(&self, line: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
    }

    fn ask(&self, question: &str) {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{question}");
        let _ = stdout.flush();
    }

    async fn read_line(&self) -> io::Result<Option<String>> {
        self.stdin.lock().await.next_line().await
    }

    fn supports_color(&self) -> bool {
        self.color
    }
}

/// Interprets one answer: `Some(true)` to proceed, `Some(false)` to
/// abort, `None` when the answer is not understood.
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "" | "y" => Some(true),
        "n" => Some(false),
        _ => None,
    }
}

/// Asks before every mutation unless prompting is switched off.
///
/// The whole question/answer exchange is serialised, so workers running
/// concurrently never interleave prompts or consume each other's
/// answers.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    skip: bool,
    exchange: Mutex<()>,
}

impl ConfirmationGate {
    pub fn new(skip: bool) -> Self {
        Self {
            skip,
            exchange: Mutex::new(()),
        }
    }

    /// Returns whether the pending mutation should go ahead.
    ///
    /// End of input and read errors decline.
    pub async fn proceed<T>(&self, terminal: &T) -> bool
    where
        T: Terminal + ?Sized,
    {
        if self.skip {
            return true;
        }

        let _exchange = self.exchange.lock().await;
        loop {
            terminal.ask(CONFIRM_QUESTION);
            let line = match terminal.read_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    terminal.say("");
                    warn!("End of input while waiting for confirmation, not proceeding");
                    return false;
                }
                Err(e) => {
                    terminal.say("");
                    warn!(error = %e, "Failed to read confirmation, not proceeding");
                    return false;
                }
            };

            match parse_answer(&line) {
                Some(answer) => return answer,
                None => terminal.say(INVALID_ANSWER),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            Mutex as StdMutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use super::*;

    #[derive(Default)]
    struct Scripted {
        answers: StdMutex<VecDeque<String>>,
        output: StdMutex<Vec<String>>,
        reads: AtomicUsize,
    }

    impl Scripted {
        fn with_answers(answers: &[&str]) -> Self {
            Self {
                answers: StdMutex::new(answers.iter().map(|a| a.to_string()).collect()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl Terminal for Scripted {
        fn say(&self, line: &str) {
            self.output.lock().unwrap().push(line.to_string());
        }

        fn ask(&self, question: &str) {
            self.output.lock().unwrap().push(question.to_string());
        }

        async fn read_line(&self) -> io::Result<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.answers.lock().unwrap().pop_front())
        }
    }

    #[test]
    fn answers_are_case_and_whitespace_insensitive() {
        assert_eq!(parse_answer(""), Some(true));
        assert_eq!(parse_answer("  \n"), Some(true));
        assert_eq!(parse_answer("Y"), Some(true));
        assert_eq!(parse_answer(" y "), Some(true));
        assert_eq!(parse_answer("N\n"), Some(false));
        assert_eq!(parse_answer("yes"), None);
        assert_eq!(parse_answer("q"), None);
    }

    #[tokio::test]
    async fn skipping_never_reads_input() {
        let terminal = Scripted::with_answers(&["n"]);
        let gate = ConfirmationGate::new(true);
        assert!(gate.proceed(&terminal).await);
        assert_eq!(terminal.reads.load(Ordering::SeqCst), 0);
        assert!(terminal.output.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_answers_are_retried() {
        let terminal = Scripted::with_answers(&["maybe", "what", "n"]);
        let gate = ConfirmationGate::new(false);
        assert!(!gate.proceed(&terminal).await);
        assert_eq!(terminal.reads.load(Ordering::SeqCst), 3);

        let output = terminal.output.lock().unwrap();
        assert_eq!(output.iter().filter(|l| *l == CONFIRM_QUESTION).count(), 3);
        assert_eq!(output.iter().filter(|l| *l == INVALID_ANSWER).count(), 2);
    }

    #[tokio::test]
    async fn empty_answer_proceeds() {
        let terminal = Scripted::with_answers(&[""]);
        assert!(ConfirmationGate::new(false).proceed(&terminal).await);
    }

    #[tokio::test]
    async fn end_of_input_declines() {
        let terminal = Scripted::default();
        assert!(!ConfirmationGate::new(false).proceed(&terminal).await);
        assert_eq!(terminal.reads.load(Ordering::SeqCst), 1);
    }
}
