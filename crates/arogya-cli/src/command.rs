//! Console command parsing.

/// One line of console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start or stop voice capture.
    Listen,
    /// Select a recognition language, or show the current one.
    Lang(Option<String>),
    /// List supported languages.
    Langs,
    /// Speak text in the selected language.
    Say(String),
    /// Read-aloud button: start or stop playback of the text.
    Play(String),
    /// Stop capture and playback.
    Stop,
    Help,
    Quit,
    /// Anything else: spoken input while listening, typed input otherwise.
    Text(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        match head {
            "listen" if rest.is_empty() => Self::Listen,
            "lang" if rest.is_empty() => Self::Lang(None),
            "lang" => Self::Lang(Some(rest.to_string())),
            "langs" if rest.is_empty() => Self::Langs,
            "say" if !rest.is_empty() => Self::Say(rest.to_string()),
            "play" if !rest.is_empty() => Self::Play(rest.to_string()),
            "stop" if rest.is_empty() => Self::Stop,
            "help" | "?" if rest.is_empty() => Self::Help,
            "quit" | "exit" if rest.is_empty() => Self::Quit,
            _ => Self::Text(line.to_string()),
        }
    }
}

pub const HELP: &str = "\
commands:
  listen         start or stop voice input
  lang [code]    show or select the recognition language
  langs          list supported languages
  say <text>     speak text in the selected language
  play <text>    start or stop read-aloud of text
  stop           stop listening and playback
  quit           exit
anything else is heard as speech while listening, or submitted as typed text";
