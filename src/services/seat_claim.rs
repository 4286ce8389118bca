//! Протокол захвата терминалов нажатием F-клавиши
//!
//! На каждую свободную клавиатуру запускается отдельный слушатель. Все слушатели
//! разделяют одно состояние (`ClaimState`) за асинхронным мьютексом: проверка
//! "терминал свободен", привязка и отметка "занят" выполняются под одной
//! блокировкой, поэтому каждый терминал занимается не более одного раза.
//!
//! Мастер запущен на каждом терминале отдельным процессом, и все процессы видят
//! одни и те же нажатия. Привязку выполняет только процесс терминала, выбранного
//! клавишей; остальные лишь отмечают терминал занятым.

use crate::config::Config;
use crate::devices::{DeviceFinder, InputDevice};
use crate::error::{Result, SeatError};
use crate::services::attachment::DeviceAttacher;
use crate::services::display::{DisplayPresenter, DisplaySurfaceTrait};
use crate::services::keyboard_listener::KeyboardListenerTrait;
use crate::services::seat_registry::SeatRegistry;
use crate::trace_if_enabled;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Итог работы мастера
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// К терминалу уже привязана клавиатура, делать нечего
    AlreadyConfigured,
    /// Терминал мастера получил клавиатуру
    Configured,
    /// Свободных клавиатур нет (единственная свободная остаётся за seat0)
    NoKeyboards,
    /// Свободные клавиатуры закончились раньше, чем дошла очередь до нашего терминала
    Exhausted,
}

impl ClaimOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ClaimOutcome::AlreadyConfigured | ClaimOutcome::Configured)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        }
    }
}

/// Сколько терминалов ещё можно настроить: одна клавиатура всегда остаётся за seat0
pub fn remaining_open_seats(open_seats: usize, remaining_keyboards: usize) -> usize {
    open_seats.min(remaining_keyboards.saturating_sub(1))
}

/// Изменяемое состояние, общее для всех слушателей
struct ClaimState {
    registry: SeatRegistry,
    remaining_keyboards: usize,
    presenter: DisplayPresenter,
}

impl ClaimState {
    fn record_claim(&mut self, index: usize) {
        if self.registry.mark_claimed(index) {
            self.remaining_keyboards = self.remaining_keyboards.saturating_sub(1);
        }
    }
}

struct ClaimContext {
    config: Arc<Config>,
    own_seat: String,
    state: Mutex<ClaimState>,
    attacher: DeviceAttacher,
    mice: Vec<InputDevice>,
}

impl ClaimContext {
    /// Перерисовать экран и решить, не пора ли завершаться
    fn refresh(&self, state: &mut ClaimState) -> Result<Option<ClaimOutcome>> {
        let own_index = state
            .registry
            .index_of(&self.own_seat)
            .ok_or_else(|| SeatError::SeatNotFound(self.own_seat.clone()))?;

        let bitmap = state.registry.bitmap(self.config.seats.max_seat_count);
        state.presenter.show_status(own_index, &bitmap)?;

        let remaining_seats = remaining_open_seats(bitmap.open_count(), state.remaining_keyboards);
        let message = self
            .config
            .render_message(remaining_seats, state.remaining_keyboards);
        state.presenter.show_message(&message)?;

        debug!(
            "Состояние терминалов: {} (осталось терминалов: {}, клавиатур: {})",
            bitmap, remaining_seats, state.remaining_keyboards
        );

        if state.registry.is_claimed(&self.own_seat) {
            return Ok(Some(ClaimOutcome::Configured));
        }

        if remaining_seats == 0 {
            info!(
                "Больше нет доступных устройств для {}. Настройка терминала прервана.",
                self.own_seat
            );
            return Ok(Some(ClaimOutcome::Exhausted));
        }

        Ok(None)
    }

    /// Привязать клавиатуру к нашему терминалу.
    ///
    /// Клавиатуре, подключённой напрямую к порту компьютера, в пару достаётся
    /// первая найденная мышь, тоже подключённая напрямую. Если таких мышей
    /// несколько, какая из них будет выбрана, не определено. Звук и съёмные
    /// носители такому терминалу не достаются.
    async fn attach_keyboard(&self, keyboard: &InputDevice, seat_name: &str) {
        self.attacher.attach_input(keyboard, seat_name).await;

        if keyboard.is_direct() {
            if let Some(mouse) = self.mice.iter().find(|mouse| mouse.is_direct()) {
                info!("В пару к клавиатуре привязываем мышь {}", mouse);
                self.attacher.attach_input(mouse, seat_name).await;
            }
        }
    }
}

/// Координатор захвата терминалов
pub struct SeatClaimCoordinator {
    config: Arc<Config>,
    own_seat: String,
    registry: SeatRegistry,
    attacher: DeviceAttacher,
}

impl SeatClaimCoordinator {
    pub fn new(
        config: Arc<Config>,
        own_seat: String,
        registry: SeatRegistry,
        attacher: DeviceAttacher,
    ) -> Self {
        Self {
            config,
            own_seat,
            registry,
            attacher,
        }
    }

    /// Запустить мастер.
    ///
    /// `open_surface` вызывается только если действительно есть что настраивать,
    /// `open_listener` - по разу на каждую свободную клавиатуру.
    pub async fn run<S, L>(
        self,
        keyboards: Vec<InputDevice>,
        mice: Vec<InputDevice>,
        open_surface: S,
        open_listener: L,
    ) -> Result<ClaimOutcome>
    where
        S: FnOnce() -> Result<Box<dyn DisplaySurfaceTrait>>,
        L: Fn(&InputDevice) -> Result<Box<dyn KeyboardListenerTrait + Send>>,
    {
        info!("Терминал мастера: {}", self.own_seat);

        if self.registry.index_of(&self.own_seat).is_none() {
            return SeatError::seat_not_found(self.own_seat);
        }

        if self.registry.is_claimed(&self.own_seat) {
            info!("К терминалу {} уже привязана клавиатура", self.own_seat);
            return Ok(ClaimOutcome::AlreadyConfigured);
        }

        let available_keyboards = DeviceFinder::unassigned(&keyboards);
        let available_mice = DeviceFinder::unassigned(&mice);
        Self::log_available("клавиатура", &available_keyboards);
        Self::log_available("мышь", &available_mice);

        if available_keyboards.len() <= 1 {
            info!(
                "Нет доступных устройств ввода для {}. Настройка терминала прервана.",
                self.own_seat
            );
            return Ok(ClaimOutcome::NoKeyboards);
        }

        let mut presenter = DisplayPresenter::new(open_surface()?, &self.config);
        presenter.set_title(&self.config.window_name(&self.own_seat))?;
        presenter.show_wait_screen()?;
        tokio::time::sleep(self.config.settle_delay()).await;

        let context = Arc::new(ClaimContext {
            config: self.config.clone(),
            own_seat: self.own_seat.clone(),
            state: Mutex::new(ClaimState {
                registry: self.registry,
                remaining_keyboards: available_keyboards.len(),
                presenter,
            }),
            attacher: self.attacher,
            mice: available_mice,
        });

        let mut listeners = JoinSet::new();
        for keyboard in available_keyboards {
            match open_listener(&keyboard) {
                Ok(listener) => {
                    listeners.spawn(Self::listen(context.clone(), keyboard, listener));
                }
                Err(e) => warn!("Клавиатура {} пропущена: {}", keyboard, e),
            }
        }

        while let Some(joined) = listeners.join_next().await {
            match joined {
                Ok(Ok(Some(outcome))) => {
                    listeners.abort_all();
                    if outcome == ClaimOutcome::Configured {
                        info!("Настройка терминала {} завершена", self.own_seat);
                    }
                    tokio::time::sleep(self.config.settle_delay()).await;
                    return Ok(outcome);
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    listeners.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    error!("Слушатель клавиатуры аварийно завершился: {}", e);
                }
            }
        }

        warn!(
            "Все слушатели клавиатур завершились, терминал {} не настроен",
            self.own_seat
        );
        Ok(ClaimOutcome::Exhausted)
    }

    /// Слушатель одной клавиатуры: живёт до первого принятого нажатия.
    ///
    /// Ошибка чтения клавиатуры завершает только этого слушателя. Наружу
    /// возвращаются лишь фатальные ошибки экрана.
    async fn listen(
        context: Arc<ClaimContext>,
        keyboard: InputDevice,
        mut listener: Box<dyn KeyboardListenerTrait + Send>,
    ) -> Result<Option<ClaimOutcome>> {
        {
            let mut state = context.state.lock().await;
            if let Some(outcome) = context.refresh(&mut state)? {
                return Ok(Some(outcome));
            }
        }

        loop {
            let event = match listener.next_key_event().await {
                Ok(event) => event,
                Err(e) => {
                    warn!("Чтение клавиатуры {} прекращено: {}", keyboard, e);
                    return Ok(None);
                }
            };

            if !event.is_press() {
                continue;
            }

            let candidate = event.key_code.seat_candidate();

            // Проверка, привязка и отметка - без отпускания блокировки
            let mut state = context.state.lock().await;
            let Some(index) = state.registry.open_seat_at(candidate) else {
                trace_if_enabled!("Нажатие {} не выбирает свободный терминал", event);
                continue;
            };
            let seat_name = match state.registry.get(index) {
                Some(seat) => seat.name.clone(),
                None => continue,
            };

            info!("Нажата клавиша F{} на клавиатуре {}", candidate, event.device_node);

            if seat_name == context.own_seat {
                context.attach_keyboard(&keyboard, &seat_name).await;
            } else {
                debug!(
                    "Терминал {} выбран с клавиатуры {}, привязку выполнит его мастер",
                    seat_name, keyboard
                );
            }

            state.record_claim(index);
            return context.refresh(&mut state);
        }
    }

    fn log_available(kind: &str, devices: &[InputDevice]) {
        for device in devices {
            info!("Доступна {}: {}", kind, device);

            if let Some(hub) = &device.parent {
                info!(">>> Родительский хаб: {}", hub);
            }
        }
    }
}
