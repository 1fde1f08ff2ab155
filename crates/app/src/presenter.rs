use std::error::Error;
use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;

use quiz_core::SessionEvent;
use services::{
    BootedQuiz, OptionMark, QuestionView, QuizError, QuizService, QuizSession, Screen,
    SummaryView, sample,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::location::Location;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// 0-based option index.
    Answer(usize),
    Next,
    Prev,
    /// Raw token typed after `#`.
    Token(String),
    Back,
    Forward,
    Restart,
    Override,
    ClearOverride,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Input {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if let Some(token) = line.strip_prefix('#') {
            return Self::Token(token.trim().to_owned());
        }
        if let Ok(choice) = line.parse::<usize>() {
            return match choice.checked_sub(1) {
                Some(index) => Self::Answer(index),
                None => Self::Unknown(line.to_owned()),
            };
        }
        match line.to_ascii_lowercase().as_str() {
            "n" | "next" | "f" | "finish" => Self::Next,
            "p" | "prev" => Self::Prev,
            "b" | "back" => Self::Back,
            "fw" | "forward" => Self::Forward,
            "r" | "restart" => Self::Restart,
            "o" | "override" => Self::Override,
            "clear-override" => Self::ClearOverride,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_owned()),
        }
    }
}

/// Draw one screen as plain text.
#[must_use]
pub fn render(screen: &Screen) -> String {
    match screen {
        Screen::Question(view) => render_question(view),
        Screen::Summary(view) => render_summary(view),
    }
}

fn render_question(view: &QuestionView) -> String {
    let mut out = String::new();
    let progress = &view.progress;
    let _ = writeln!(
        out,
        "[score {} | {}/{} answered | {}%]",
        progress.score,
        progress.answered,
        progress.total,
        progress.percent()
    );
    let _ = writeln!(out, "{}", view.heading);
    for option in &view.options {
        let marker = match option.mark {
            OptionMark::Unmarked => "",
            OptionMark::ChosenCorrect => "  (+) your answer, correct",
            OptionMark::ChosenWrong => "  (-) your answer",
            OptionMark::Correct => "  (*) correct answer",
        };
        let _ = writeln!(out, "  {}) {}{marker}", option.index + 1, option.text);
    }

    let mut controls = Vec::new();
    if !view.locked {
        controls.push(format!("[1-{}] answer", view.options.len()));
    }
    if view.prev_enabled {
        controls.push("[p] Prev".to_owned());
    }
    if view.next_enabled {
        controls.push(format!("[n] {}", view.next_label.as_str()));
    }
    controls.push("[h] help".to_owned());
    let _ = write!(out, "{}", controls.join("  "));
    out
}

fn render_summary(view: &SummaryView) -> String {
    format!(
        "Quiz complete!\nScore: {} / {}\n[r] Restart  [h] help",
        view.score, view.total
    )
}

/// One-line feedback for an event, if it deserves one.
#[must_use]
pub fn notice(event: SessionEvent) -> Option<String> {
    match event {
        SessionEvent::AnswerRecorded {
            correct: true,
            score,
            ..
        } => Some(format!("Correct! Score: {score}")),
        SessionEvent::AnswerRecorded { score, .. } => Some(format!("Incorrect. Score: {score}")),
        SessionEvent::Restarted => Some("Progress cleared. Starting over.".to_owned()),
        SessionEvent::Navigated(_) => None,
    }
}

const HELP: &str = "\
Commands:
  <number>         answer with that option
  n, next, finish  go to the next question or the summary
  p, prev          go to the previous question
  #<token>         jump to a token (a question number or `complete`)
  back, forward    walk the navigation history
  r, restart       clear progress and start over
  o, override      paste a local dataset
  clear-override   drop the local dataset and reload
  q, quit          leave";

/// Line-oriented quiz presenter.
pub struct Presenter<R, W> {
    quiz: Arc<QuizService>,
    input: Lines<R>,
    out: W,
    location: Location,
}

impl<R, W> Presenter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(quiz: Arc<QuizService>, input: R, out: W) -> Self {
        Self {
            quiz,
            input: input.lines(),
            out,
            location: Location::new(),
        }
    }

    /// Run until the user quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns the load error when the dataset cannot be loaded and no
    /// override is pasted, or any storage or terminal I/O failure.
    pub async fn run(&mut self) -> Result<(), Box<dyn Error>> {
        let Some(mut session) = self.boot().await? else {
            return Ok(());
        };

        loop {
            self.deliver_tokens(&mut session);
            writeln!(self.out, "\n{}", render(&session.screen()))?;
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = self.input.next_line().await? else {
                return Ok(());
            };
            match Input::parse(&line) {
                Input::Answer(selected) => self.answer(&mut session, selected).await?,
                Input::Next => match session.next() {
                    Some(token) => self.location.push(token.as_str()),
                    None => writeln!(self.out, "answer the question first")?,
                },
                Input::Prev => match session.prev() {
                    Some(token) => self.location.push(token.as_str()),
                    None => writeln!(self.out, "already at the first question")?,
                },
                Input::Token(token) => self.location.push(&token),
                Input::Back => {
                    if !self.location.back() {
                        writeln!(self.out, "no earlier history")?;
                    }
                }
                Input::Forward => {
                    if !self.location.forward() {
                        writeln!(self.out, "no later history")?;
                    }
                }
                Input::Restart => {
                    let (event, token) = self.quiz.restart(&mut session).await?;
                    self.announce(event)?;
                    self.location.push(token.as_str());
                }
                Input::Override => {
                    if self.edit_override().await? {
                        match self.boot().await? {
                            Some(rebooted) => session = rebooted,
                            None => return Ok(()),
                        }
                    }
                }
                Input::ClearOverride => {
                    self.quiz.clear_override().await?;
                    writeln!(self.out, "local dataset removed, reloading")?;
                    match self.boot().await? {
                        Some(rebooted) => session = rebooted,
                        None => return Ok(()),
                    }
                }
                Input::Help => writeln!(self.out, "{HELP}")?,
                Input::Quit => return Ok(()),
                Input::Empty => {}
                Input::Unknown(raw) => writeln!(self.out, "unknown command: {raw} (h for help)")?,
            }
        }
    }

    fn announce(&mut self, event: SessionEvent) -> Result<(), Box<dyn Error>> {
        if let Some(line) = notice(event) {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn deliver_tokens(&mut self, session: &mut QuizSession) {
        while let Some(token) = self.location.poll() {
            match session.route(&token) {
                Some(event) => log::debug!("token {token:?}: {event:?}"),
                None => log::debug!("token {token:?} ignored"),
            }
        }
    }

    async fn answer(
        &mut self,
        session: &mut QuizSession,
        selected: usize,
    ) -> Result<(), Box<dyn Error>> {
        match self.quiz.answer(session, selected).await {
            Ok(Some(event)) => self.announce(event),
            Ok(None) => {
                writeln!(self.out, "already answered")?;
                Ok(())
            }
            Err(err @ (QuizError::NotOnQuestion | QuizError::UnknownOption { .. })) => {
                writeln!(self.out, "{err}")?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Boot the dataset, falling back to the override editor on failure.
    ///
    /// `None` means the user gave up without providing a dataset.
    async fn boot(&mut self) -> Result<Option<QuizSession>, Box<dyn Error>> {
        loop {
            match self.quiz.boot().await {
                Ok(booted) => return Ok(Some(self.start(booted)?)),
                Err(err) => {
                    log::warn!("dataset load failed: {err}");
                    writeln!(
                        self.out,
                        "Could not load questions from {}: {err}",
                        self.quiz.dataset_location()
                    )?;
                    writeln!(self.out, "You can paste a local dataset instead.")?;
                    if !self.edit_override().await? {
                        return Err(err.into());
                    }
                }
            }
        }
    }

    fn start(&mut self, booted: BootedQuiz) -> Result<QuizSession, Box<dyn Error>> {
        writeln!(
            self.out,
            "Loaded {} questions ({:?}).",
            booted.session.total(),
            booted.origin
        )?;
        self.location = Location::new();
        self.location.push(booted.initial_token.as_str());
        Ok(booted.session)
    }

    /// Read a pasted dataset up to an empty line and store it.
    ///
    /// Returns `true` once an override was stored.
    async fn edit_override(&mut self) -> Result<bool, Box<dyn Error>> {
        loop {
            writeln!(
                self.out,
                "Paste a JSON array of questions and finish with an empty line \
                 (an empty paste cancels). Example:\n{}",
                sample::sample_json()
            )?;
            self.out.flush()?;

            let mut pasted = String::new();
            while let Some(line) = self.input.next_line().await? {
                if line.trim().is_empty() {
                    break;
                }
                pasted.push_str(&line);
                pasted.push('\n');
            }
            if pasted.trim().is_empty() {
                return Ok(false);
            }

            match self.quiz.submit_override(&pasted).await {
                Ok(count) => {
                    writeln!(self.out, "Stored local dataset ({count} records).")?;
                    return Ok(true);
                }
                Err(err) => writeln!(self.out, "Invalid dataset: {err}")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::{AppServices, FileDatasetFetcher, NextLabel, OptionView, ProgressView};

    fn missing_source() -> AppServices {
        AppServices::in_memory(Arc::new(FileDatasetFetcher::new(
            "/definitely/not/here/dataset.json",
        )))
    }

    async fn play(services: &AppServices, script: &str) -> (String, Result<(), String>) {
        let mut out = Vec::new();
        let result = Presenter::new(services.quiz(), script.as_bytes(), &mut out)
            .run()
            .await
            .map_err(|e| e.to_string());
        (String::from_utf8(out).unwrap(), result)
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Input::parse(" 2 "), Input::Answer(1));
        assert_eq!(Input::parse("0"), Input::Unknown("0".into()));
        assert_eq!(Input::parse("Next"), Input::Next);
        assert_eq!(Input::parse("finish"), Input::Next);
        assert_eq!(Input::parse("#complete"), Input::Token("complete".into()));
        assert_eq!(Input::parse("# 3"), Input::Token("3".into()));
        assert_eq!(Input::parse("back"), Input::Back);
        assert_eq!(Input::parse(""), Input::Empty);
        assert_eq!(Input::parse("dance"), Input::Unknown("dance".into()));
    }

    #[test]
    fn renders_answered_question() {
        let view = QuestionView {
            position: 2,
            source_number: 7,
            heading: "Q2. Which is prone to PSE?".into(),
            options: vec![
                OptionView {
                    index: 0,
                    text: "Berkshire".into(),
                    mark: OptionMark::ChosenWrong,
                },
                OptionView {
                    index: 1,
                    text: "Pietrain".into(),
                    mark: OptionMark::Correct,
                },
            ],
            locked: true,
            prev_enabled: true,
            next_label: NextLabel::Finish,
            next_enabled: true,
            progress: ProgressView {
                score: 1,
                answered: 2,
                total: 2,
            },
        };

        let text = render(&Screen::Question(view));

        assert!(text.contains("[score 1 | 2/2 answered | 100%]"));
        assert!(text.contains("Q2. Which is prone to PSE?"));
        assert!(text.contains("1) Berkshire  (-) your answer"));
        assert!(text.contains("2) Pietrain  (*) correct answer"));
        assert!(text.contains("[p] Prev  [n] Finish"));
        assert!(!text.contains("answer  "));
    }

    #[test]
    fn notices_follow_events() {
        assert_eq!(
            notice(SessionEvent::AnswerRecorded {
                question_index: 0,
                selected: 3,
                correct: true,
                score: 1
            })
            .as_deref(),
            Some("Correct! Score: 1")
        );
        assert_eq!(
            notice(SessionEvent::AnswerRecorded {
                question_index: 1,
                selected: 0,
                correct: false,
                score: 1
            })
            .as_deref(),
            Some("Incorrect. Score: 1")
        );
        assert_eq!(
            notice(SessionEvent::Navigated(quiz_core::NavState::Complete)),
            None
        );
    }

    #[tokio::test]
    async fn load_failure_without_paste_is_fatal() {
        let services = missing_source();

        let (out, result) = play(&services, "\n").await;

        assert!(out.contains("Could not load questions from /definitely/not/here/dataset.json"));
        assert!(out.contains("Sample: Which breed has large litters?"));
        assert!(result.unwrap_err().contains("/definitely/not/here/dataset.json"));
    }

    #[tokio::test]
    async fn pasted_dataset_is_played_to_the_summary() {
        let services = missing_source();
        let script = format!(
            "[oops\n\n{}\n\n4\nn\n1\nfinish\nq\n",
            sample::sample_json()
        );

        let (out, result) = play(&services, &script).await;

        assert!(result.is_ok());
        assert!(out.contains("Invalid dataset"));
        assert!(out.contains("Stored local dataset (2 records)."));
        assert!(out.contains("Loaded 2 questions (Override)."));
        assert!(out.contains("1) Landrace"));
        assert!(out.contains("4) Large White  (+) your answer, correct"));
        assert!(out.contains("3) Pietrain  (*) correct answer"));
        assert!(out.contains("Correct! Score: 1"));
        assert!(out.contains("Incorrect. Score: 1"));
        assert!(out.contains("Quiz complete!\nScore: 1 / 2"));
    }

    #[tokio::test]
    async fn history_and_restart_drive_navigation() {
        let services = missing_source();
        services
            .quiz()
            .submit_override(&sample::sample_json())
            .await
            .unwrap();

        let script = "n\n1\nn\nback\nforward\n#1\nr\nq\n";
        let (out, result) = play(&services, script).await;

        assert!(result.is_ok());
        assert!(out.contains("answer the question first"));
        assert!(out.contains("Q2. Sample: Which is prone to PSE?"));
        assert!(out.contains("Progress cleared. Starting over."));

        let rebooted = services.quiz().boot().await.unwrap();
        assert_eq!(rebooted.initial_token.as_str(), "1");
        assert_eq!(rebooted.session.progress().answered, 0);
    }
}
