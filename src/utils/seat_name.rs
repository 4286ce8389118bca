use crate::error::{Result, SeatError};
use std::process::Command;
use tracing::debug;

/// Определить имя терминала, на котором запущен мастер.
///
/// Сначала `XDG_SEAT`; если переменной нет, ищем аргумент `seat*` в командной
/// строке Xorg, обслуживающего наш `DISPLAY`.
pub fn resolve_seat_name() -> Result<String> {
    if let Ok(seat) = std::env::var("XDG_SEAT") {
        if !seat.is_empty() {
            return Ok(seat);
        }
    }

    let display = std::env::var("DISPLAY").map_err(|_| {
        SeatError::SeatNotFound("не заданы ни XDG_SEAT, ни DISPLAY".to_string())
    })?;

    let output = Command::new("ps")
        .args(["--no-headers", "-o", "cmd", "-C", "Xorg"])
        .output()?;
    let output = String::from_utf8_lossy(&output.stdout);
    debug!("Командные строки Xorg:\n{}", output.trim());

    seat_from_xorg_cmdlines(&output, &display).ok_or_else(|| {
        SeatError::SeatNotFound(format!("не удалось определить терминал для DISPLAY={}", display))
    })
}

/// `:1.0` -> ищем строку с аргументом `:1` и берём первый аргумент, начинающийся с `seat`
pub fn seat_from_xorg_cmdlines(cmdlines: &str, display: &str) -> Option<String> {
    let display_number = display.split('.').next().unwrap_or(display);

    cmdlines
        .lines()
        .filter(|line| line.split_whitespace().any(|arg| arg == display_number))
        .flat_map(|line| line.split_whitespace())
        .find(|arg| arg.starts_with("seat"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PS_OUTPUT: &str = "/usr/lib/xorg/Xorg -core :0 -seat seat0 -auth /var/run/lightdm/root/:0 vt7\n\
                             /usr/lib/xorg/Xorg -core :1 -seat seat1 -auth /var/run/lightdm/root/:1 -novtswitch\n\
                             /usr/lib/xorg/Xorg -core :2 -seat seat2 -auth /var/run/lightdm/root/:2 -novtswitch\n";

    #[test]
    fn test_seat_from_matching_display() {
        assert_eq!(seat_from_xorg_cmdlines(PS_OUTPUT, ":1.0").as_deref(), Some("seat1"));
        assert_eq!(seat_from_xorg_cmdlines(PS_OUTPUT, ":2").as_deref(), Some("seat2"));
    }

    #[test]
    fn test_display_number_matches_whole_argument() {
        let cmdlines = "/usr/lib/xorg/Xorg -core :10 -seat seat10 -auth /var/run/lightdm/root/:10\n\
                        /usr/lib/xorg/Xorg -core :11 -seat seat11 -auth /root/:1\n\
                        /usr/lib/xorg/Xorg -core :1 -seat seat1 -auth /var/run/lightdm/root/:1\n";

        assert_eq!(seat_from_xorg_cmdlines(cmdlines, ":1.0").as_deref(), Some("seat1"));
        assert_eq!(seat_from_xorg_cmdlines(cmdlines, ":10").as_deref(), Some("seat10"));
    }

    #[test]
    fn test_unknown_display_has_no_seat() {
        assert_eq!(seat_from_xorg_cmdlines(PS_OUTPUT, ":7"), None);
        assert_eq!(seat_from_xorg_cmdlines("", ":0"), None);
    }
}
