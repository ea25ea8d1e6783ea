//! Line-based terminal front end.
//!
//! Reads commands from stdin, turns them into `AppEvent`s and prints
//! whatever the event loop sends back.

use std::fmt::Write as _;
use std::io::BufRead;

use kanal::{AsyncReceiver, AsyncSender};
use poplingo_gemini::markup::{Segment, split_highlights};
use poplingo_types::{
    AppEvent, AudioTarget, DictionaryEntry, FlashcardSide, StudyCard, StudyCommand,
};
use tokio_util::sync::CancellationToken;

const HELP: &str = "\
Commands:
  search <text>      look up a word or phrase (alias: s)
  save               save the current result
  list               show the notebook
  delete <n>         remove notebook entry n
  play [n]           pronounce the term, or example n
  chat <text>        ask the tutor about the current word
  story              a short story using your saved words
  study              start flashcards (next, prev, flip)
  lang <native> <target>   e.g. `lang en ja`
  swap               swap native and target language
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Send(AppEvent),
    Print(String),
    Nothing,
}

/// What the terminal currently shows
#[derive(Debug, Default)]
pub struct UiView {
    notebook: Vec<DictionaryEntry>,
    /// Entry that `play` and `chat` refer to
    focus: Option<DictionaryEntry>,
    bold: bool,
}

impl UiView {
    pub fn new(bold: bool) -> Self {
        Self {
            bold,
            ..Default::default()
        }
    }

    /// Text to print for an event from the app, if any
    pub fn render(&mut self, event: AppEvent) -> Option<String> {
        match event {
            AppEvent::BackendReady => Some("Ready. Type `help` for commands.".to_string()),
            AppEvent::SearchStarted(query) => Some(format!("Looking up '{}'...", query.trim())),
            AppEvent::ShowEntry { entry, saved } => {
                let text = self.render_entry(&entry, saved);
                self.focus = Some(entry);
                Some(text)
            }
            AppEvent::SearchFailed(notice) => Some(notice),
            AppEvent::NotebookChanged(entries) => {
                if let Some(focus) = &mut self.focus {
                    if let Some(updated) = entries.iter().find(|e| e.id == focus.id) {
                        *focus = updated.clone();
                    }
                }
                self.notebook = entries;
                None
            }
            AppEvent::ChatReply(message) => {
                Some(format!("tutor: {}", self.highlighted(&message.text)))
            }
            AppEvent::ShowStory(story) => Some(format!("Story:\n{}", self.highlighted(&story))),
            AppEvent::ShowCard(Some(card)) => {
                let text = self.render_card(&card);
                self.focus = Some(card.entry);
                Some(text)
            }
            AppEvent::ShowCard(None) => {
                Some("Your notebook is empty. Save some words to study.".to_string())
            }
            AppEvent::LanguagesChanged(pair) => Some(format!(
                "Learning {} (explanations in {})",
                pair.target, pair.native
            )),
            AppEvent::Status(message) => Some(message),
            _ => None,
        }
    }

    pub fn render_notebook(&self) -> String {
        if self.notebook.is_empty() {
            return "Your notebook is empty.".to_string();
        }

        let mut out = String::from("Notebook:");
        for (i, entry) in self.notebook.iter().enumerate() {
            let _ = write!(out, "\n  {:>2}. {}  {}", i + 1, entry.term, entry.definition);
        }
        out
    }

    fn render_entry(&self, entry: &DictionaryEntry, saved: bool) -> String {
        let mut out = entry.term.clone();
        if let Some(phonetic) = &entry.phonetic {
            let _ = write!(out, " {phonetic}");
        }
        if saved {
            out.push_str("  (saved)");
        }

        let _ = write!(out, "\n  {}", entry.definition);
        for (i, example) in entry.examples.iter().enumerate() {
            let _ = write!(
                out,
                "\n  {}. {}\n     {}",
                i + 1,
                self.highlighted(&example.original),
                example.translation
            );
        }
        if !entry.usage_note.is_empty() {
            let _ = write!(out, "\n  Note: {}", entry.usage_note);
        }
        if entry.image_url.is_some() {
            out.push_str("\n  [illustration available]");
        }
        out
    }

    fn render_card(&self, card: &StudyCard) -> String {
        let entry = &card.entry;
        let mut out = format!("[{}/{}] ", card.position, card.total);

        match card.side {
            FlashcardSide::Front => {
                out.push_str(&entry.term);
                if let Some(phonetic) = &entry.phonetic {
                    let _ = write!(out, " {phonetic}");
                }
                if entry.image_url.is_some() {
                    out.push_str("  [illustration]");
                }
                out.push_str("\n  (flip to reveal)");
            }
            FlashcardSide::Back => {
                let _ = write!(out, "{}\n  {}", entry.term, entry.definition);
                if let Some(example) = entry.examples.first() {
                    let _ = write!(
                        out,
                        "\n  {}\n  {}",
                        self.highlighted(&example.original),
                        example.translation
                    );
                }
            }
        }
        out
    }

    fn highlighted(&self, text: &str) -> String {
        split_highlights(text)
            .into_iter()
            .map(|segment| match segment {
                Segment::Plain(s) => s.to_string(),
                Segment::Highlight(s) if self.bold => format!("\x1b[1m{s}\x1b[0m"),
                Segment::Highlight(s) => format!("*{s}*"),
            })
            .collect()
    }
}

/// Parse one input line
pub fn parse_command(line: &str, view: &UiView) -> Result<UiAction, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(UiAction::Nothing);
    }

    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map(|(c, r)| (c, r.trim()))
        .unwrap_or((line, ""));

    let event = match command.to_lowercase().as_str() {
        "search" | "s" => {
            if rest.is_empty() {
                return Err("Usage: search <word or phrase>".to_string());
            }
            AppEvent::Search(rest.to_string())
        }
        "save" => AppEvent::SaveActive,
        "list" | "ls" => return Ok(UiAction::Print(view.render_notebook())),
        "delete" | "rm" => {
            let n = parse_position(rest, "delete <n>")?;
            let entry = view
                .notebook
                .get(n - 1)
                .ok_or_else(|| format!("No notebook entry #{n}."))?;
            AppEvent::Delete(entry.id)
        }
        "play" => {
            let entry = view
                .focus
                .as_ref()
                .ok_or_else(|| "Look up a word first.".to_string())?;
            if rest.is_empty() {
                AppEvent::PlayAudio(AudioTarget::Term(entry.id))
            } else {
                let n = parse_position(rest, "play [n]")?;
                AppEvent::PlayAudio(AudioTarget::Example {
                    entry: entry.id,
                    index: n - 1,
                })
            }
        }
        "chat" => {
            if rest.is_empty() {
                return Err("Usage: chat <message>".to_string());
            }
            AppEvent::SendChat(rest.to_string())
        }
        "story" => AppEvent::GenerateStory,
        "study" => AppEvent::StartStudy,
        "next" | "n" => AppEvent::Study(StudyCommand::Next),
        "prev" | "p" => AppEvent::Study(StudyCommand::Previous),
        "flip" | "f" => AppEvent::Study(StudyCommand::Flip),
        "lang" => match rest.split_whitespace().collect::<Vec<_>>()[..] {
            [native, target] => AppEvent::SetLanguages {
                native: native.to_string(),
                target: target.to_string(),
            },
            _ => return Err("Usage: lang <native> <target>".to_string()),
        },
        "swap" => AppEvent::SwapLanguages,
        "help" | "?" => return Ok(UiAction::Print(HELP.to_string())),
        "quit" | "exit" | "q" => AppEvent::Quit,
        _ => return Err(format!("Unknown command '{command}'. Type `help`.")),
    };

    Ok(UiAction::Send(event))
}

/// 1-based position argument
fn parse_position(arg: &str, usage: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("Usage: {usage}")),
    }
}

/// Forward stdin lines from a plain thread so a pending read never holds
/// up runtime shutdown
fn spawn_stdin_reader() -> AsyncReceiver<String> {
    let (tx, rx) = kanal::bounded::<String>(16);

    let spawned = std::thread::Builder::new()
        .name("poplingo-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("[UI] Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        });

    if let Err(e) = spawned {
        tracing::error!("[UI] Could not start stdin reader: {}", e);
    }

    rx.to_async()
}

pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let lines = spawn_stdin_reader();
    let mut view = UiView::new(atty::is(atty::Stream::Stdout));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_to_ui_rx.recv() => {
                if let Some(text) = view.render(event?) {
                    println!("{text}");
                }
            }
            line = lines.recv() => {
                let Ok(line) = line else {
                    tracing::info!("[UI] Input closed");
                    ui_to_app_tx.send(AppEvent::Quit).await?;
                    break;
                };

                match parse_command(&line, &view) {
                    Ok(UiAction::Send(event)) => {
                        let quit = matches!(event, AppEvent::Quit);
                        ui_to_app_tx.send(event).await?;
                        if quit {
                            break;
                        }
                    }
                    Ok(UiAction::Print(text)) => println!("{text}"),
                    Ok(UiAction::Nothing) => {}
                    Err(message) => println!("{message}"),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use poplingo_types::{Definition, ExampleSentence, LanguagePair};

    use super::*;

    fn entry(term: &str) -> DictionaryEntry {
        DictionaryEntry::compose(
            term,
            &LanguagePair::new("English", "Spanish"),
            Definition {
                definition: format!("meaning of {term}"),
                phonetic: Some("/x/".to_string()),
                examples: vec![
                    ExampleSentence::new(format!("Un <b>{term}</b>."), "One."),
                    ExampleSentence::new("Otro.", "Another."),
                ],
                usage_note: String::new(),
            },
            None,
        )
    }

    fn view_with(notebook: Vec<DictionaryEntry>, focus: Option<DictionaryEntry>) -> UiView {
        let mut view = UiView::new(false);
        view.render(AppEvent::NotebookChanged(notebook));
        if let Some(entry) = focus {
            view.render(AppEvent::ShowEntry { entry, saved: false });
        }
        view
    }

    #[test]
    fn test_parse_search_keeps_phrase() {
        let view = UiView::default();
        assert_eq!(
            parse_command("s  buenos días ", &view),
            Ok(UiAction::Send(AppEvent::Search("buenos días".to_string())))
        );
        assert!(parse_command("search", &view).is_err());
        assert_eq!(parse_command("   ", &view), Ok(UiAction::Nothing));
    }

    #[test]
    fn test_parse_delete_uses_list_position() {
        let a = entry("a");
        let b = entry("b");
        let view = view_with(vec![a, b.clone()], None);

        assert_eq!(
            parse_command("delete 2", &view),
            Ok(UiAction::Send(AppEvent::Delete(b.id)))
        );
        assert!(parse_command("delete 3", &view).is_err());
        assert!(parse_command("delete 0", &view).is_err());
    }

    #[test]
    fn test_parse_play_targets_focus() {
        let gato = entry("gato");
        let view = view_with(Vec::new(), Some(gato.clone()));

        assert_eq!(
            parse_command("play", &view),
            Ok(UiAction::Send(AppEvent::PlayAudio(AudioTarget::Term(gato.id))))
        );
        assert_eq!(
            parse_command("play 2", &view),
            Ok(UiAction::Send(AppEvent::PlayAudio(AudioTarget::Example {
                entry: gato.id,
                index: 1
            })))
        );
        assert!(parse_command("play", &UiView::default()).is_err());
    }

    #[test]
    fn test_parse_lang() {
        let view = UiView::default();
        assert_eq!(
            parse_command("lang en ja", &view),
            Ok(UiAction::Send(AppEvent::SetLanguages {
                native: "en".to_string(),
                target: "ja".to_string()
            }))
        );
        assert!(parse_command("lang en", &view).is_err());
        assert!(parse_command("dance", &view).is_err());
    }

    #[test]
    fn test_render_entry_marks_highlight() {
        let mut view = UiView::new(false);
        let text = view
            .render(AppEvent::ShowEntry {
                entry: entry("gato"),
                saved: true,
            })
            .unwrap();

        assert!(text.starts_with("gato /x/  (saved)"));
        assert!(text.contains("1. Un *gato*."));
    }

    #[test]
    fn test_card_back_shows_first_example_only() {
        let mut view = UiView::new(false);
        let card = StudyCard {
            entry: entry("gato"),
            side: FlashcardSide::Back,
            position: 1,
            total: 2,
        };

        let text = view.render(AppEvent::ShowCard(Some(card))).unwrap();

        assert!(text.starts_with("[1/2] gato"));
        assert!(text.contains("Un *gato*."));
        assert!(!text.contains("Otro."));
    }

    #[test]
    fn test_notebook_change_refreshes_focus() {
        let mut gato = entry("gato");
        let mut view = view_with(Vec::new(), Some(gato.clone()));

        gato.pronunciation_audio = Some("PCM".to_string());
        view.render(AppEvent::NotebookChanged(vec![gato]));

        assert_eq!(
            view.focus.and_then(|e| e.pronunciation_audio).as_deref(),
            Some("PCM")
        );
    }
}
