use clap::{Args, Subcommand};
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::cli::utils::{output_collection, output_success};
use crate::cli::{CliContext, OutputFormat};
use crate::error::{ClientError, ClientResult};
use crate::models::{OptionLabel, QuizInput};
use crate::quiz::{AttemptSink, QuizPhase, QuizSessionController, SubmitOutcome};

#[derive(Subcommand)]
pub enum QuizCommands {
    #[command(about = "Take the quiz (interactive unless --answers is given)")]
    Take {
        #[arg(long, help = "Only questions for this topic id")]
        topic: Option<i64>,
        #[arg(
            long,
            value_delimiter = ',',
            help = "Answers in question order, e.g. B,C,A; submits without prompting"
        )]
        answers: Option<Vec<String>>,
    },

    #[command(about = "List quizzes in the question bank")]
    List {
        #[arg(long, help = "Only questions for this topic id")]
        topic: Option<i64>,
    },

    #[command(about = "Add a quiz question")]
    Add {
        #[command(flatten)]
        fields: QuizFields,
    },

    #[command(about = "Replace a quiz question")]
    Update {
        #[arg(help = "Quiz id")]
        id: i64,
        #[command(flatten)]
        fields: QuizFields,
    },

    #[command(about = "Delete a quiz question")]
    Delete {
        #[arg(help = "Quiz id")]
        id: i64,
    },
}

#[derive(Args)]
pub struct QuizFields {
    #[arg(long, help = "Topic id the question belongs to")]
    pub topic: i64,
    #[arg(long)]
    pub question: String,
    #[arg(long = "option-a")]
    pub option_a: String,
    #[arg(long = "option-b")]
    pub option_b: String,
    #[arg(long = "option-c")]
    pub option_c: String,
    #[arg(long = "option-d")]
    pub option_d: String,
    #[arg(long, help = "Correct option: A, B, C or D")]
    pub correct: String,
}

impl QuizFields {
    fn into_input(self) -> ClientResult<QuizInput> {
        Ok(QuizInput {
            question: self.question,
            option_a: self.option_a,
            option_b: self.option_b,
            option_c: self.option_c,
            option_d: self.option_d,
            correct_answer: OptionLabel::parse(&self.correct)?,
            topic_id: self.topic,
        })
    }
}

pub async fn handle(cmd: QuizCommands, ctx: &CliContext) -> anyhow::Result<()> {
    match cmd {
        QuizCommands::Take { topic, answers } => take(ctx, topic, answers).await,
        QuizCommands::List { topic } => {
            ctx.guard("/add-quiz")?;
            let quizzes = ctx.client.list_quizzes(topic).await?;
            output_collection(&ctx.output, "quizzes", &quizzes, |q| {
                format!(
                    "[{}] topic {} | {} (answer {})",
                    q.quiz_id, q.topic_id, q.question, q.correct_answer
                )
            })
        }
        QuizCommands::Add { fields } => {
            ctx.guard("/add-quiz")?;
            let quiz = ctx.client.create_quiz(&fields.into_input()?).await?;
            output_success(
                &ctx.output,
                &format!("Quiz {} added", quiz.quiz_id),
                Some(json!({ "quiz": quiz })),
            )
        }
        QuizCommands::Update { id, fields } => {
            ctx.guard("/add-quiz")?;
            let quiz = ctx.client.update_quiz(id, &fields.into_input()?).await?;
            output_success(
                &ctx.output,
                &format!("Quiz {} updated", id),
                Some(json!({ "quiz": quiz })),
            )
        }
        QuizCommands::Delete { id } => {
            ctx.guard("/add-quiz")?;
            ctx.client.delete_quiz(id).await?;
            output_success(
                &ctx.output,
                &format!("Quiz {} deleted", id),
                Some(json!({ "quiz_id": id })),
            )
        }
    }
}

async fn take(ctx: &CliContext, topic: Option<i64>, answers: Option<Vec<String>>) -> anyhow::Result<()> {
    let identity = ctx.guard("/quiz")?;
    let mut controller = QuizSessionController::new(ctx.config.quiz.submit_mode);

    if controller.load(&ctx.client, topic).await == QuizPhase::Empty {
        // Only an empty bank is a normal outcome; load failures surface as errors
        if let Some(err) = controller.take_load_error() {
            return Err(err.into());
        }
        return output_success(&ctx.output, "No quizzes available", Some(json!({ "attempts": [] })));
    }

    let outcome = match answers {
        Some(answers) => {
            apply_answers(&mut controller, &answers)?;
            Some(controller.submit(&ctx.client, identity.user_id()).await?)
        }
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            // Keep stdout clean for the JSON result
            match ctx.output {
                OutputFormat::Json => {
                    let mut out = tokio::io::stderr();
                    run_session(&mut controller, &ctx.client, identity.user_id(), stdin, &mut out).await?
                }
                OutputFormat::Text => {
                    let mut out = tokio::io::stdout();
                    run_session(&mut controller, &ctx.client, identity.user_id(), stdin, &mut out).await?
                }
            }
        }
    };

    match outcome {
        Some(SubmitOutcome::Submitted { attempts }) => {
            let correct = attempts.iter().filter(|a| a.is_correct != 0).count();
            output_success(
                &ctx.output,
                &format!("Quiz submitted: {} answer(s) recorded, {} correct", attempts.len(), correct),
                Some(json!({ "attempts": attempts, "correct": correct })),
            )
        }
        Some(SubmitOutcome::AlreadySubmitted) => {
            output_success(&ctx.output, "Quiz already submitted", None)
        }
        None => output_success(
            &ctx.output,
            "Quiz abandoned, nothing was submitted",
            Some(json!({ "attempts": [] })),
        ),
    }
}

/// Answer questions in order from a list of labels, leaving the last
/// answered question on screen
pub fn apply_answers(controller: &mut QuizSessionController, answers: &[String]) -> ClientResult<()> {
    if answers.len() > controller.len() {
        return Err(ClientError::validation(
            "answers",
            format!("{} answers given for {} questions", answers.len(), controller.len()),
        ));
    }

    for (i, raw) in answers.iter().enumerate() {
        if i > 0 {
            controller.next();
        }
        controller.select_current(OptionLabel::parse(raw)?)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizKey {
    Next,
    Prev,
    Select(OptionLabel),
    Submit,
    Quit,
    Help,
}

pub fn parse_key(line: &str) -> Option<QuizKey> {
    match line.trim().to_lowercase().as_str() {
        "n" | "next" => Some(QuizKey::Next),
        "p" | "prev" | "previous" => Some(QuizKey::Prev),
        "s" | "submit" => Some(QuizKey::Submit),
        "q" | "quit" | "exit" => Some(QuizKey::Quit),
        "?" | "h" | "help" => Some(QuizKey::Help),
        other => OptionLabel::parse(other).ok().map(QuizKey::Select),
    }
}

const HELP: &str = "a-d to answer, n/p to move, s to submit, q to quit\n";

/// Drive a loaded session from line input until it is submitted or the
/// user quits. Returns `None` when nothing was submitted.
///
/// A failed submit is reported and the session stays open for a retry;
/// only a lost session aborts the loop.
pub async fn run_session<R, W, S>(
    controller: &mut QuizSessionController,
    sink: &S,
    user_id: i64,
    input: R,
    out: &mut W,
) -> anyhow::Result<Option<SubmitOutcome>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: AttemptSink + ?Sized,
{
    let mut lines = input.lines();
    out.write_all(HELP.as_bytes()).await?;
    render(controller, out).await?;

    loop {
        out.write_all(b"> ").await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };

        match parse_key(&line) {
            Some(QuizKey::Next) => {
                if controller.next() {
                    render(controller, out).await?;
                } else {
                    out.write_all(b"Already at the last question\n").await?;
                }
            }
            Some(QuizKey::Prev) => {
                if controller.prev() {
                    render(controller, out).await?;
                } else {
                    out.write_all(b"Already at the first question\n").await?;
                }
            }
            Some(QuizKey::Select(label)) => match controller.select_current(label) {
                Ok(()) => out.write_all(format!("Selected {}\n", label).as_bytes()).await?,
                Err(e) => out.write_all(format!("{}\n", e).as_bytes()).await?,
            },
            Some(QuizKey::Submit) => match controller.submit(sink, user_id).await {
                Ok(outcome) => return Ok(Some(outcome)),
                Err(e @ ClientError::Unauthorized { .. }) => return Err(e.into()),
                Err(e) if e.is_local() => out.write_all(format!("{}\n", e).as_bytes()).await?,
                Err(e) => {
                    out.write_all(format!("Submit failed: {}. Press s to try again.\n", e).as_bytes())
                        .await?
                }
            },
            Some(QuizKey::Quit) => return Ok(None),
            Some(QuizKey::Help) => out.write_all(HELP.as_bytes()).await?,
            None if line.trim().is_empty() => {}
            None => out.write_all(format!("Unknown command '{}'\n", line.trim()).as_bytes()).await?,
        }
    }
}

async fn render<W: AsyncWrite + Unpin>(controller: &QuizSessionController, out: &mut W) -> anyhow::Result<()> {
    let Some(view) = controller.view() else {
        return Ok(());
    };

    let mut text = format!("\nQuestion {} of {}\n{}\n", view.index + 1, view.total, view.quiz.question);
    for (label, option) in view.quiz.options() {
        let marker = if view.selected == Some(label) { '*' } else { ' ' };
        text.push_str(&format!("{} {}) {}\n", marker, label, option));
    }
    out.write_all(text.as_bytes()).await?;
    Ok(())
}
