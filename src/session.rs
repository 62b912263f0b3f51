use futures::{SinkExt, StreamExt};
use log::{debug, info};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{AnyDelimiterCodec, FramedRead, FramedWrite, LinesCodec};

use crate::error::SessionError;
use crate::random_names::{GenerationRequest, NameGenerator, RandomSource};
use crate::words::WordSet;

const NAME_PROMPT: &str = "\n\nEnter a name to generate suggestions (or type 'exit' to quit):";
const CHOICE_PROMPT: &str =
    "\nWould you like to generate more, start a new name, or exit? (more/new/exit) [default: more]";
const EXIT: &str = "exit";
const GOODBYE: &str = "Goodbye!";

/// Per-session defaults offered at the prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub count: usize,
    pub max_length: usize,
    pub alliteration: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            count: 20,
            max_length: 32,
            alliteration: true,
        }
    }
}

/// Answers are split on `\n` as raw bytes so a line that is not UTF-8 is
/// decoded lossily instead of ending the session.
pub struct Console<R, W> {
    stream: FramedRead<R, AnyDelimiterCodec>,
    sink: FramedWrite<W, LinesCodec>,
}

impl<R, W> Console<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            stream: FramedRead::new(
                reader,
                AnyDelimiterCodec::new(b"\n".to_vec(), b"\n".to_vec()),
            ),
            sink: FramedWrite::new(writer, LinesCodec::new()),
        }
    }

    async fn say(&mut self, line: &str) -> Result<(), SessionError> {
        self.sink.send(line).await?;
        Ok(())
    }

    /// Print `prompt` and wait for a trimmed answer. `None` once input is closed.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>, SessionError> {
        self.say(prompt).await?;
        match self.stream.next().await {
            Some(line) => Ok(Some(String::from_utf8_lossy(&line?).trim().to_owned())),
            None => Ok(None),
        }
    }

    #[cfg(test)]
    fn into_writer(self) -> W {
        self.sink.into_inner()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    More,
    New,
    Exit,
}

#[derive(Debug)]
enum ChoiceError {
    Unknown,
}

impl std::fmt::Display for ChoiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Invalid input. Please type 'more', 'new', or 'exit'."),
        }
    }
}

fn parse_choice(answer: &str) -> Result<Choice, ChoiceError> {
    match answer.to_lowercase().as_str() {
        "" | "more" => Ok(Choice::More),
        "new" => Ok(Choice::New),
        EXIT => Ok(Choice::Exit),
        _ => Err(ChoiceError::Unknown),
    }
}

fn parse_alliteration(answer: &str, default: bool) -> bool {
    match answer.to_lowercase().as_str() {
        "" => default,
        "yes" | "y" => true,
        _ => false,
    }
}

/// `None` when the answer is not a positive number.
fn parse_max_length(answer: &str, default: usize) -> Option<usize> {
    if answer.is_empty() {
        return Some(default);
    }
    match answer.parse::<i64>() {
        Ok(value) if value > 0 => usize::try_from(value).ok(),
        _ => None,
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

enum Flow {
    NextName,
    Quit,
}

pub struct Session<G> {
    words: WordSet,
    generator: NameGenerator<G>,
    settings: Settings,
}

impl<G: RandomSource> Session<G> {
    pub fn new(words: WordSet, generator: NameGenerator<G>, settings: Settings) -> Self {
        Self {
            words,
            generator,
            settings,
        }
    }

    /// Drive the prompt loop until the user exits or input closes.
    pub async fn run<R, W>(&mut self, console: &mut Console<R, W>) -> Result<(), SessionError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Session started");
        let result = self.prompt_loop(console).await;
        info!("Session finished");
        result
    }

    async fn prompt_loop<R, W>(&mut self, console: &mut Console<R, W>) -> Result<(), SessionError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let Some(name) = console.ask(NAME_PROMPT).await? else {
                return Ok(());
            };

            if name.to_lowercase() == EXIT {
                console.say(GOODBYE).await?;
                return Ok(());
            }

            if name.is_empty() {
                console.say("Please enter a valid name.").await?;
                continue;
            }

            let Some(request) = self.ask_preferences(console, name).await? else {
                return Ok(());
            };

            match self.suggest(console, &request).await? {
                Flow::NextName => continue,
                Flow::Quit => return Ok(()),
            }
        }
    }

    async fn ask_preferences<R, W>(
        &self,
        console: &mut Console<R, W>,
        name: String,
    ) -> Result<Option<GenerationRequest>, SessionError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let prompt = format!(
            "Do you want alliteration? (yes/no) [default: {}]:",
            yes_no(self.settings.alliteration)
        );
        let Some(answer) = console.ask(&prompt).await? else {
            return Ok(None);
        };
        let alliteration = parse_alliteration(&answer, self.settings.alliteration);

        let prompt = format!("Enter the maximum length [default: {}]:", self.settings.max_length);
        let Some(answer) = console.ask(&prompt).await? else {
            return Ok(None);
        };
        let max_length = match parse_max_length(&answer, self.settings.max_length) {
            Some(value) => value,
            None => {
                console
                    .say(&format!(
                        "Invalid input. Using default max length of {}.",
                        self.settings.max_length
                    ))
                    .await?;
                self.settings.max_length
            }
        };

        Ok(Some(GenerationRequest {
            name,
            count: self.settings.count,
            alliteration,
            max_length,
        }))
    }

    /// Print batches for one name until the user moves on.
    async fn suggest<R, W>(
        &mut self,
        console: &mut Console<R, W>,
        request: &GenerationRequest,
    ) -> Result<Flow, SessionError>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            console.say("\nGenerating suggestions...\n").await?;

            let suggestions = match self.generator.generate(request, &self.words) {
                Ok(suggestions) => suggestions,
                Err(e) => {
                    debug!("Generation failed: {e}");
                    console.say(&e.to_string()).await?;
                    Vec::new()
                }
            };

            if suggestions.is_empty() {
                console
                    .say(&format!("No suggestions could be generated for '{}'.", request.name))
                    .await?;
                return Ok(Flow::NextName);
            }

            for suggestion in &suggestions {
                console.say(suggestion).await?;
            }

            if suggestions.len() < request.count {
                console
                    .say("\nNo more unique suggestions can be generated for this name.")
                    .await?;
                return Ok(Flow::NextName);
            }

            let choice = loop {
                let Some(answer) = console.ask(CHOICE_PROMPT).await? else {
                    return Ok(Flow::Quit);
                };
                match parse_choice(&answer) {
                    Ok(choice) => break choice,
                    Err(e) => console.say(&e.to_string()).await?,
                }
            };

            match choice {
                Choice::More => continue,
                Choice::New => return Ok(Flow::NextName),
                Choice::Exit => {
                    console.say(GOODBYE).await?;
                    return Ok(Flow::Quit);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> WordSet {
        WordSet::from_words([
            "happy", "hungry", "hasty", "hairy", "heavy", "hunter", "helper",
            "healer", "holder", "mighty", "mister",
        ])
    }

    async fn run_script(script: &str, settings: Settings) -> String {
        run_bytes(script.as_bytes(), settings).await
    }

    async fn run_bytes(script: &[u8], settings: Settings) -> String {
        let mut session = Session::new(
            words(),
            NameGenerator::new(fastrand::Rng::with_seed(17)),
            settings,
        );
        let mut console = Console::new(script, Vec::new());
        session.run(&mut console).await.unwrap();
        String::from_utf8(console.into_writer()).unwrap()
    }

    #[test]
    fn choice_defaults_to_more() {
        assert_eq!(parse_choice("").unwrap(), Choice::More);
        assert_eq!(parse_choice("MORE").unwrap(), Choice::More);
        assert_eq!(parse_choice("new").unwrap(), Choice::New);
        assert_eq!(parse_choice("Exit").unwrap(), Choice::Exit);
    }

    #[test]
    fn unknown_choice_is_error() {
        match parse_choice("maybe") {
            Ok(_) => panic!("maybe is not a choice"),
            Err(e) => assert_eq!(
                e.to_string(),
                "Invalid input. Please type 'more', 'new', or 'exit'."
            ),
        }
    }

    #[test]
    fn alliteration_answers() {
        assert!(parse_alliteration("", true));
        assert!(!parse_alliteration("", false));
        assert!(parse_alliteration("YES", false));
        assert!(parse_alliteration("y", false));
        assert!(!parse_alliteration("no", true));
        assert!(!parse_alliteration("sure", true));
    }

    #[test]
    fn max_length_answers() {
        assert_eq!(parse_max_length("", 32), Some(32));
        assert_eq!(parse_max_length("12", 32), Some(12));
        assert_eq!(parse_max_length("0", 32), None);
        assert_eq!(parse_max_length("-4", 32), None);
        assert_eq!(parse_max_length("long", 32), None);
    }

    #[tokio::test]
    async fn exit_at_name_prompt() {
        let output = run_script("EXIT\n", Settings::default()).await;
        assert!(output.contains("Enter a name"));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn closed_input_ends_quietly() {
        let output = run_script("", Settings::default()).await;
        assert!(output.contains("Enter a name"));
        assert!(!output.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn empty_name_is_reprompted() {
        let output = run_script("\nexit\n", Settings::default()).await;
        assert!(output.contains("Please enter a valid name."));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn no_alliterative_words_reported() {
        let output = run_script("Zoe\n\n\nexit\n", Settings::default()).await;
        assert!(output.contains("No adjectives or nouns found starting with 'z'."));
        assert!(output.contains("No suggestions could be generated for 'Zoe'."));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn invalid_max_length_falls_back() {
        let settings = Settings {
            count: 3,
            ..Settings::default()
        };
        let output = run_script("Hal\nyes\nabc\nexit\n", settings).await;
        assert!(output.contains("Invalid input. Using default max length of 32."));
        assert!(output.contains("Generating suggestions..."));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn prints_a_full_batch_then_more() {
        let settings = Settings {
            count: 3,
            ..Settings::default()
        };
        let output = run_script("Hal\n\n\n\nexit\n", settings).await;

        let batches = output.matches("Generating suggestions...").count();
        assert_eq!(batches, 2);
        let suggestions: Vec<&str> = output
            .lines()
            .filter(|line| line.starts_with("Hal"))
            .collect();
        assert_eq!(suggestions.len(), 6);
        for suggestion in suggestions {
            assert!(suggestion.chars().count() <= 32);
        }
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn unknown_choice_reprompts() {
        let settings = Settings {
            count: 2,
            ..Settings::default()
        };
        let output = run_script("Hal\n\n\nperhaps\nnew\nexit\n", settings).await;
        assert!(output.contains("Invalid input. Please type 'more', 'new', or 'exit'."));
        assert_eq!(output.matches("Generating suggestions...").count(), 1);
        assert_eq!(output.matches("Enter a name").count(), 2);
    }

    #[tokio::test]
    async fn short_batch_ends_the_name() {
        // Only "mighty" and "mister" start with m: one combination.
        let output = run_script("Mo\n\n\nexit\n", Settings::default()).await;
        assert!(output.contains("No more unique suggestions can be generated for this name."));
        assert!(!output.contains("more/new/exit"));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn undecodable_name_is_read_lossily() {
        let output = run_bytes(b"Jos\xe9\nyes\n\nexit\n", Settings::default()).await;
        assert!(output.contains("No suggestions could be generated for 'Jos\u{FFFD}'."));
        assert!(output.ends_with("Goodbye!\n"));
    }

    #[tokio::test]
    async fn crlf_answers_are_trimmed() {
        let output = run_bytes(b"\r\nEXIT\r\n", Settings::default()).await;
        assert!(output.contains("Please enter a valid name."));
        assert!(output.ends_with("Goodbye!\n"));
    }
}
