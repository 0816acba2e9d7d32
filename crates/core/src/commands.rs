use crate::errors::CoreError;

/// Flag that lets `sell` drive a holding below zero.
pub const FORCE_FLAG: &str = "--force";

pub const HELP: &str = "\
Commands:
  buy <token> <qty>            add quantity to an existing holding
  sell <token> <qty> [--force] subtract quantity (--force allows going negative)
  add <token> [qty]            look the token up on the market and add it
  remove <token>               delete a holding (exact name)
  show                         print holdings and totals
  refresh                      fetch fresh prices for every holding
  get <query>                  print the current market quote of a token
  save                         write the portfolio file
  help                         print this message
  quit | exit                  leave (unsaved changes are lost)";

/// One parsed line of the command prompt.
///
/// Token names may span several words ("shiba inu"); where a quantity is
/// expected it is always the last argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Buy { token: String, quantity: f64 },
    Sell { token: String, quantity: f64, force: bool },
    Add { query: String, quantity: f64 },
    Remove { token: String },
    Show,
    Refresh,
    Get { query: String },
    Save,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`; anything else is
    /// either a command or a [`CoreError::Usage`].
    pub fn parse(line: &str) -> Result<Option<Command>, CoreError> {
        let mut words = line.split_whitespace();
        let verb = match words.next() {
            Some(v) => v.to_lowercase(),
            None => return Ok(None),
        };
        let args: Vec<&str> = words.collect();

        let command = match verb.as_str() {
            "buy" => {
                let (token, quantity) = token_and_quantity(&args, "buy <token> <qty>")?;
                Command::Buy { token, quantity }
            }
            "sell" => {
                let force = args.iter().any(|a| a.eq_ignore_ascii_case(FORCE_FLAG));
                let rest: Vec<&str> = args
                    .into_iter()
                    .filter(|a| !a.eq_ignore_ascii_case(FORCE_FLAG))
                    .collect();
                let (token, quantity) = token_and_quantity(&rest, "sell <token> <qty> [--force]")?;
                Command::Sell { token, quantity, force }
            }
            "add" => {
                if args.is_empty() {
                    return Err(CoreError::Usage("add <token> [qty]".into()));
                }
                match args.split_last() {
                    Some((last, rest)) if !rest.is_empty() && last.parse::<f64>().is_ok() => {
                        Command::Add {
                            query: rest.join(" "),
                            quantity: parse_quantity(last)?,
                        }
                    }
                    _ => Command::Add {
                        query: args.join(" "),
                        quantity: 0.0,
                    },
                }
            }
            "remove" => Command::Remove {
                token: joined(&args, "remove <token>")?,
            },
            "get" => Command::Get {
                query: joined(&args, "get <query>")?,
            },
            "show" => Command::Show,
            "refresh" => Command::Refresh,
            "save" => Command::Save,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(CoreError::Usage(format!(
                    "unknown command '{other}', type 'help' for a list"
                )))
            }
        };

        Ok(Some(command))
    }
}

fn token_and_quantity(args: &[&str], usage: &str) -> Result<(String, f64), CoreError> {
    match args.split_last() {
        Some((last, rest)) if !rest.is_empty() => Ok((rest.join(" "), parse_quantity(last)?)),
        _ => Err(CoreError::Usage(usage.to_string())),
    }
}

fn joined(args: &[&str], usage: &str) -> Result<String, CoreError> {
    if args.is_empty() {
        return Err(CoreError::Usage(usage.to_string()));
    }
    Ok(args.join(" "))
}

fn parse_quantity(text: &str) -> Result<f64, CoreError> {
    match text.parse::<f64>() {
        Ok(q) if q.is_finite() => Ok(q),
        _ => Err(CoreError::Usage(format!("'{text}' is not a valid quantity"))),
    }
}
