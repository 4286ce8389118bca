use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod devices;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use devices::{DeviceFinder, InputDevice};
use services::{
    create_display_surface, create_keyboard_listener, create_seat_manager, DeviceAttacher,
    SeatClaimCoordinator, SeatRegistry, UdevRules,
};

#[derive(Parser, Debug)]
#[command(name = "multiseat-wizard")]
#[command(about = "Мастер привязки клавиатур, мышей и USB-хабов к терминалам многоместной станции")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "multiseat-wizard.toml")]
    config: String,

    /// Режим сухого запуска (без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (по умолчанию из конфигурации)
    #[arg(long)]
    log_level: Option<String>,

    /// Терминал мастера (по умолчанию XDG_SEAT или аргумент -seat у Xorg)
    #[arg(long)]
    seat: Option<String>,

    /// Только вывести найденные устройства и выйти
    #[arg(long)]
    list_devices: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);

    // Инициализация системы логирования
    init_tracing(args.log_level.as_deref().unwrap_or(&config.logging.level))?;

    info!("Запуск multiseat-wizard v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    let keyboards = DeviceFinder::scan_keyboards()?;
    let mice = DeviceFinder::scan_mice()?;

    if args.list_devices {
        print_devices("Клавиатуры", &keyboards);
        print_devices("Мыши", &mice);
        return Ok(ExitCode::SUCCESS);
    }

    // Проверка прав доступа
    if !args.dry_run {
        utils::permissions::check_permissions()?;
    }

    let own_seat = match args.seat {
        Some(seat) => seat,
        None => utils::seat_name::resolve_seat_name()?,
    };

    let seat_manager = create_seat_manager(&config, args.dry_run).await?;
    let registry = SeatRegistry::build(seat_manager.list_seats().await?, &keyboards);
    info!("Терминалы: {:?}", registry.names().collect::<Vec<_>>());
    let attacher = DeviceAttacher::new(
        seat_manager,
        UdevRules::new(config.udev.reload_rules, args.dry_run),
    );
    let coordinator = SeatClaimCoordinator::new(config.clone(), own_seat, registry, attacher);

    let dry_run = args.dry_run;
    let wizard = coordinator.run(
        keyboards,
        mice,
        || create_display_surface(dry_run),
        |keyboard| create_keyboard_listener(&config, keyboard, dry_run),
    );

    let outcome = tokio::select! {
        outcome = wizard => match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Мастер аварийно завершился: {}", e);
                return Err(e.into());
            }
        },
        signal = signal::ctrl_c() => {
            match signal {
                Ok(()) => warn!("Получен сигнал завершения (Ctrl+C), настройка прервана"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
            return Ok(ExitCode::from(1));
        }
    };

    info!("multiseat-wizard завершил работу: {:?}", outcome);
    Ok(outcome.exit_code())
}

fn print_devices(title: &str, devices: &[InputDevice]) {
    println!("{}:", title);

    for device in devices {
        let seat = device.info.seat.as_deref().unwrap_or("-");
        println!("  {} [{}] devpath={}", device, seat, device.info.devpath);

        if let Some(hub) = &device.parent {
            println!("    >>> {}", hub);
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
