use crate::error::{LaunchError, Result};
use crate::options::OptionStore;

pub const LIST_FLAG: &str = "--ls";
pub const HELP_FLAG: &str = "--help";

pub const HARNESS_USAGE: &str = "mmtk-harness <plan> <script_name> [key=value ...] [--ls] [--help]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    ListScripts,
    Help,
    Invocation {
        options: OptionStore,
        positionals: Vec<String>,
    },
}

/// Sorts raw command-line tokens into overrides and positionals.
///
/// `--ls` wins over everything else, including tokens that would fail to
/// parse, so it is looked for before any token is classified. `--help` is
/// honoured at the point it is reached.
pub fn classify<I, S>(tokens: I, defaults: OptionStore) -> Result<Classified>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens: Vec<S> = tokens.into_iter().collect();
    if tokens.iter().any(|t| t.as_ref() == LIST_FLAG) {
        return Ok(Classified::ListScripts);
    }

    let mut options = defaults;
    let mut positionals = Vec::new();
    for token in &tokens {
        let token = token.as_ref();
        if token == HELP_FLAG {
            return Ok(Classified::Help);
        }
        if token.contains('=') {
            let (key, value) = split_option(token)?;
            options.set(key, value);
        } else {
            positionals.push(token.to_string());
        }
    }
    Ok(Classified::Invocation {
        options,
        positionals,
    })
}

fn split_option(token: &str) -> Result<(&str, &str)> {
    let malformed = || LaunchError::MalformedOption {
        token: token.to_string(),
    };
    let (key, value) = token.split_once('=').ok_or_else(malformed)?;
    if key.is_empty() || value.contains('=') {
        return Err(malformed());
    }
    Ok((key, value))
}
