use crate::devices::InputDevice;
use smallvec::SmallVec;
use std::fmt;

/// Локальный терминал хоста, всегда считается настроенным
pub const LOCAL_SEAT: &str = "seat0";

/// Состояние позиции на экране статуса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatState {
    Claimed,
    Open,
    /// Позиция за пределами известных терминалов
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatEntry {
    pub name: String,
    pub claimed: bool,
}

/// Состояния терминалов в каноническом порядке, дополненные до MAX_SEAT_COUNT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatBitmap(SmallVec<[SeatState; 8]>);

impl SeatBitmap {
    pub fn states(&self) -> &[SeatState] {
        &self.0
    }

    pub fn open_count(&self) -> usize {
        self.states()
            .iter().filter(|state| **state == SeatState::Open).count()
    }

    /// Часть имени файла экрана: по символу на каждый терминал после локального.
    /// Отсутствующие позиции кодируются как `0`, для них нет отдельных картинок.
    pub fn file_code(&self) -> String {
        self.states()
            .iter()
            .skip(1)
            .map(|state| match state {
                SeatState::Claimed => '1',
                SeatState::Open | SeatState::Absent => '0',
            })
            .collect()
    }
}

impl fmt::Display for SeatBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in self.states() {
            let symbol = match state {
                SeatState::Claimed => '1',
                SeatState::Open => '0',
                SeatState::Absent => '-',
            };
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// Упорядоченная таблица терминалов: `seat0` первым, остальные по алфавиту.
///
/// Индекс в таблице одновременно номер на экране и номер F-клавиши.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRegistry {
    seats: Vec<SeatEntry>,
}

impl SeatRegistry {
    /// Терминал считается настроенным, если это `seat0` или к нему уже привязана клавиатура
    pub fn build<I, S>(seat_names: I, keyboards: &[InputDevice]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let seats = Self::order_seats(seat_names)
            .into_iter()
            .map(|name| {
                let claimed = name == LOCAL_SEAT
                    || keyboards
                        .iter()
                        .any(|keyboard| keyboard.info.seat.as_deref() == Some(name.as_str()));
                SeatEntry { name, claimed }
            })
            .collect();

        Self { seats }
    }

    /// Сортировка по имени с переносом `seat0` в начало
    pub fn order_seats<I, S>(seat_names: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = seat_names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();

        if let Some(position) = names.iter().position(|name| name == LOCAL_SEAT) {
            let local = names.remove(position);
            names.insert(0, local);
        }

        names
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.seats.iter().map(|seat| seat.name.as_str())
    }

    pub fn get(&self, index: usize) -> Option<&SeatEntry> {
        self.seats.get(index)
    }

    pub fn index_of(&self, seat_name: &str) -> Option<usize> {
        self.seats.iter().position(|seat| seat.name == seat_name)
    }

    pub fn is_claimed(&self, seat_name: &str) -> bool {
        self.seats
            .iter()
            .any(|seat| seat.name == seat_name && seat.claimed)
    }

    /// Терминал, который выбирает кандидат F-клавиши, если он ещё свободен.
    ///
    /// Индекс 0 (`seat0`) и индексы за пределами таблицы не выбираются.
    pub fn open_seat_at(&self, candidate: i32) -> Option<usize> {
        let index = usize::try_from(candidate).ok().filter(|index| *index >= 1)?;
        self.seats
            .get(index)
            .filter(|seat| !seat.claimed)
            .map(|_| index)
    }

    /// Отметить терминал занятым; возвращает `false`, если он уже был занят
    pub fn mark_claimed(&mut self, index: usize) -> bool {
        match self.seats.get_mut(index) {
            Some(seat) if !seat.claimed => {
                seat.claimed = true;
                true
            }
            _ => false,
        }
    }

    pub fn bitmap(&self, max_seat_count: usize) -> SeatBitmap {
        let mut states: SmallVec<[SeatState; 8]> = self
            .seats
            .iter()
            .map(|seat| {
                if seat.claimed {
                    SeatState::Claimed
                } else {
                    SeatState::Open
                }
            })
            .collect();

        while states.len() < max_seat_count {
            states.push(SeatState::Absent);
        }

        SeatBitmap(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::DeviceInfo;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn keyboard(seat: Option<&str>) -> InputDevice {
        InputDevice {
            info: DeviceInfo {
                syspath: PathBuf::from("/sys/class/input/event7"),
                devpath: "/class/input/event7".to_string(),
                devnode: Some(PathBuf::from("/dev/input/event7")),
                seat: seat.map(str::to_string),
                tags: BTreeSet::new(),
            },
            parent: None,
        }
    }

    #[test]
    fn test_order_places_seat0_first() {
        assert_eq!(
            SeatRegistry::order_seats(["seat0", "seat3", "seat1"]),
            vec!["seat0", "seat1", "seat3"]
        );
        assert_eq!(
            SeatRegistry::order_seats(["seat2", "seat-a", "seat0", "seat10"]),
            vec!["seat0", "seat-a", "seat10", "seat2"]
        );
    }

    #[test]
    fn test_build_marks_configured_seats() {
        let keyboards = vec![keyboard(Some("seat3")), keyboard(None)];
        let registry = SeatRegistry::build(["seat3", "seat0", "seat1"], &keyboards);

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["seat0", "seat1", "seat3"]);
        assert!(registry.is_claimed("seat0"));
        assert!(!registry.is_claimed("seat1"));
        assert!(registry.is_claimed("seat3"));
    }

    #[test]
    fn test_function_key_maps_to_open_seat() {
        let mut registry = SeatRegistry::build(["seat0", "seat3", "seat1"], &[]);
        assert!(registry.mark_claimed(1));

        // F3 -> индекс 2 -> seat3
        assert_eq!(registry.open_seat_at(2), Some(2));
        assert!(registry.mark_claimed(2));
        assert_eq!(registry.open_seat_at(2), None);
    }

    #[test]
    fn test_out_of_range_candidates_are_rejected() {
        let registry = SeatRegistry::build(["seat0", "seat1"], &[]);
        assert_eq!(registry.open_seat_at(0), None);
        assert_eq!(registry.open_seat_at(-4), None);
        assert_eq!(registry.open_seat_at(2), None);
        assert_eq!(registry.open_seat_at(1), Some(1));
    }

    #[test]
    fn test_mark_claimed_is_idempotent() {
        let mut registry = SeatRegistry::build(["seat0", "seat1"], &[]);
        assert!(registry.mark_claimed(1));
        assert!(!registry.mark_claimed(1));
        assert!(!registry.mark_claimed(0));
    }

    #[test]
    fn test_bitmap_pads_missing_seats() {
        let mut registry = SeatRegistry::build(["seat0", "seat1", "seat2"], &[]);
        registry.mark_claimed(2);

        let bitmap = registry.bitmap(5);
        assert_eq!(
            bitmap.states(),
            &[
                SeatState::Claimed,
                SeatState::Open,
                SeatState::Claimed,
                SeatState::Absent,
                SeatState::Absent
            ]
        );
        assert_eq!(bitmap.file_code(), "0100");
        assert_eq!(bitmap.open_count(), 1);
        assert_eq!(bitmap.to_string(), "101--");
    }
}
