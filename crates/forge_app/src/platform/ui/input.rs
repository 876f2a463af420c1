use forge_core::Msg;

/// What a line of terminal input asks the application to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Msg(Msg),
    /// Pick the history row at this 1-based position.
    UseHistory(usize),
    Help,
    Redraw,
    Unknown(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Requirement,
    HtmlContext,
    Feedback,
}

impl Field {
    fn into_msg(self, text: String) -> Msg {
        match self {
            Field::Requirement => Msg::RequirementChanged(text),
            Field::HtmlContext => Msg::HtmlContextChanged(text),
            Field::Feedback => Msg::FeedbackChanged(text),
        }
    }
}

/// Turns lines into [`AppEvent`]s. Multi-line fields are collected until a lone `.`.
#[derive(Debug, Default)]
pub struct InputParser {
    collecting: Option<(Field, Vec<String>)>,
}

pub const HELP: &str = "\
Commands:
  url <address>        set the target page
  req [text]           set the requirement (no text: type lines, end with '.')
  template <ID>        fill the requirement from ICIO, CRISPE or RESCEF
  clear-req            empty the requirement
  advanced             show or hide the HTML context
  html [text]          set the HTML context (no text: type lines, end with '.')
  generate             generate the script (also: go, submit)
  ok | wrong           rate the latest version
  feedback [text]      describe what is wrong (no text: multi-line)
  cancel               close the feedback box
  regen                ask for a fixed version (also: fix)
  copy [n]             copy the code of result n (default 1)
  use <n>              reuse history entry n
  clear-history        forget all history
  new                  start a new task
  y | n                answer the pending question
  show                 redraw the screen
  quit                 leave";

impl InputParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting.is_some()
    }

    /// Returns `None` while a multi-line field is still being typed or the line is blank.
    pub fn feed(&mut self, line: &str) -> Option<AppEvent> {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some((field, mut lines)) = self.collecting.take() {
            if line.trim() == "." {
                return Some(AppEvent::Msg(field.into_msg(lines.join("\n"))));
            }
            lines.push(line.to_string());
            self.collecting = Some((field, lines));
            return None;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let (command, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (trimmed, ""),
        };

        let event = match command.to_ascii_lowercase().as_str() {
            "help" | "?" => AppEvent::Help,
            "show" | "history" => AppEvent::Redraw,
            "url" => AppEvent::Msg(Msg::UrlChanged(rest.to_string())),
            "req" => return self.text_field(Field::Requirement, rest),
            "html" => return self.text_field(Field::HtmlContext, rest),
            "feedback" => return self.text_field(Field::Feedback, rest),
            "advanced" => AppEvent::Msg(Msg::AdvancedToggled),
            "template" if !rest.is_empty() => {
                AppEvent::Msg(Msg::FrameworkSelected(rest.to_string()))
            }
            "clear-req" => AppEvent::Msg(Msg::RequirementCleared),
            "generate" | "go" | "submit" => AppEvent::Msg(Msg::Submitted),
            "ok" => AppEvent::Msg(Msg::MarkedCorrect),
            "wrong" => AppEvent::Msg(Msg::MarkedIncorrect),
            "cancel" => AppEvent::Msg(Msg::FeedbackCancelled),
            "regen" | "fix" => AppEvent::Msg(Msg::RegenerateClicked),
            "copy" => match position(rest, 1) {
                Some(n) => AppEvent::Msg(Msg::CopyClicked { index: n - 1 }),
                None => AppEvent::Unknown(trimmed.to_string()),
            },
            "use" => match position(rest, 0) {
                Some(n) => AppEvent::UseHistory(n),
                None => AppEvent::Unknown(trimmed.to_string()),
            },
            "clear-history" => AppEvent::Msg(Msg::ClearHistoryClicked),
            "new" => AppEvent::Msg(Msg::NewTask),
            "y" | "yes" => AppEvent::Msg(Msg::ConfirmationAnswered(true)),
            "n" | "no" => AppEvent::Msg(Msg::ConfirmationAnswered(false)),
            "quit" | "exit" => AppEvent::Quit,
            _ => AppEvent::Unknown(trimmed.to_string()),
        };
        Some(event)
    }

    fn text_field(&mut self, field: Field, rest: &str) -> Option<AppEvent> {
        if rest.is_empty() {
            self.collecting = Some((field, Vec::new()));
            None
        } else {
            Some(AppEvent::Msg(field.into_msg(rest.to_string())))
        }
    }
}

/// Parses a 1-based position; blank input yields `default` when it is non-zero.
fn position(text: &str, default: usize) -> Option<usize> {
    if text.is_empty() {
        return (default > 0).then_some(default);
    }
    text.parse::<usize>().ok().filter(|n| *n > 0)
}
