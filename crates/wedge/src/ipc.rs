//! Line protocol spoken over the daemon's unix socket.
//!
//! One request per line:
//!
//! ```text
//! press X Y [BUTTON]
//! release X Y [BUTTON]
//! move X Y
//! dismiss
//! ```

use crate::geometry::Point;
use crate::pointer::{Button, ButtonParseError, PointerEvent};
use std::fmt;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::str::FromStr;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/wheel.sock";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    Pointer(PointerEvent),
    /// Close the menu without dispatching anything.
    Dismiss,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestParseError {
    #[error("empty request")]
    Empty,
    #[error("unknown request '{0}'")]
    UnknownVerb(String),
    #[error("'{verb}' expects {expected} arguments, got {got}")]
    Arity {
        verb: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("invalid coordinate '{0}'")]
    Coordinate(String),
    #[error(transparent)]
    Button(#[from] ButtonParseError),
}

fn parse_point(x: &str, y: &str) -> Result<Point, RequestParseError> {
    let coord = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| RequestParseError::Coordinate(s.to_string()))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

fn parse_button_event(
    verb: &'static str,
    args: &[&str],
) -> Result<(Point, Button), RequestParseError> {
    match args {
        [x, y] => Ok((parse_point(x, y)?, Button::default())),
        [x, y, b] => Ok((parse_point(x, y)?, b.parse()?)),
        _ => Err(RequestParseError::Arity {
            verb,
            expected: "2 or 3",
            got: args.len(),
        }),
    }
}

impl FromStr for Request {
    type Err = RequestParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(RequestParseError::Empty)?;
        let args: Vec<&str> = words.collect();

        match verb.to_ascii_lowercase().as_str() {
            "press" => {
                let (position, button) = parse_button_event("press", &args)?;
                Ok(Self::Pointer(PointerEvent::Press { position, button }))
            }
            "release" => {
                let (position, button) = parse_button_event("release", &args)?;
                Ok(Self::Pointer(PointerEvent::Release { position, button }))
            }
            "move" => match args.as_slice() {
                [x, y] => Ok(Self::Pointer(PointerEvent::Move {
                    position: parse_point(x, y)?,
                })),
                _ => Err(RequestParseError::Arity {
                    verb: "move",
                    expected: "2",
                    got: args.len(),
                }),
            },
            "dismiss" => Ok(Self::Dismiss),
            _ => Err(RequestParseError::UnknownVerb(verb.to_string())),
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pointer(PointerEvent::Press { position, button }) => {
                write!(f, "press {} {} {}", position.x, position.y, button)
            }
            Self::Pointer(PointerEvent::Release { position, button }) => {
                write!(f, "release {} {} {}", position.x, position.y, button)
            }
            Self::Pointer(PointerEvent::Move { position }) => {
                write!(f, "move {} {}", position.x, position.y)
            }
            Self::Dismiss => write!(f, "dismiss"),
        }
    }
}

pub fn send(request: &Request) -> std::io::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH)?;
    writeln!(stream, "{}", request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_press_with_default_button() {
        let req: Request = "press 812 440".parse().unwrap();
        assert_eq!(
            req,
            Request::Pointer(PointerEvent::Press {
                position: Point::new(812.0, 440.0),
                button: Button::RIGHT,
            })
        );
    }

    #[test]
    fn test_parse_release_with_named_button() {
        let req: Request = "  release 1.5 -20 middle ".parse().unwrap();
        assert_eq!(
            req,
            Request::Pointer(PointerEvent::Release {
                position: Point::new(1.5, -20.0),
                button: Button::MIDDLE,
            })
        );
    }

    #[test]
    fn test_display_parses_back() {
        let requests = [
            "press 10 20 3",
            "release 10.5 20 1",
            "move 0 0",
            "dismiss",
        ];
        for line in requests {
            let req: Request = line.parse().unwrap();
            assert_eq!(req.to_string(), line);
        }
    }

    #[test]
    fn test_rejects_malformed_lines() {
        assert_eq!("".parse::<Request>(), Err(RequestParseError::Empty));
        assert!(matches!(
            "show".parse::<Request>(),
            Err(RequestParseError::UnknownVerb(_))
        ));
        assert!(matches!(
            "move 1".parse::<Request>(),
            Err(RequestParseError::Arity { got: 1, .. })
        ));
        assert!(matches!(
            "press x 2".parse::<Request>(),
            Err(RequestParseError::Coordinate(_))
        ));
        assert!(matches!(
            "press 1 2 nope".parse::<Request>(),
            Err(RequestParseError::Button(_))
        ));
        assert!(matches!(
            "move NaN 2".parse::<Request>(),
            Err(RequestParseError::Coordinate(_))
        ));
    }
}
