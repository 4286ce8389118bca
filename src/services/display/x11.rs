use crate::error::Result;
use crate::seat_error;
use std::path::Path;
use tracing::{info, warn};
use x11rb::connection::Connection;
use x11rb::image::Image;
use x11rb::protocol::xproto::{
    AtomEnum, ChangeGCAux, ConnectionExt as _, CreateGCAux, CreateWindowAux, Font, Gcontext,
    PropMode, Rectangle, Window, WindowClass,
};
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;
use x11rb::COPY_DEPTH_FROM_PARENT;

use super::r#trait::DisplaySurfaceTrait;

/// Фон вокруг картинки (#0088AA)
const BACKGROUND: [u8; 3] = [0x00, 0x88, 0xAA];
const TEXT_COLOR: u32 = 0x00FF_FFFF;
const TEXT_POSITION: (i16, i16) = (10, 30);
const FONT_PATTERNS: [&str; 2] = ["-misc-fixed-bold-r-normal--18-*-*-*-*-*-iso8859-1", "fixed"];

fn pixel([r, g, b]: [u8; 3]) -> u32 {
    // TrueColor 24/32 bpp: 0x00RRGGBB
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

fn blend(foreground: u8, background: u8, alpha: u8) -> u8 {
    let alpha = u16::from(alpha);
    ((u16::from(foreground) * alpha + u16::from(background) * (255 - alpha)) / 255) as u8
}

/// Полноэкранное окно X11 на экране по умолчанию (`DISPLAY`)
pub struct X11Surface {
    conn: RustConnection,
    window: Window,
    gc: Gcontext,
    width: u16,
    height: u16,
    depth: u8,
}

impl X11Surface {
    pub fn connect() -> Result<Self> {
        info!(
            "Подключение к X-серверу {}",
            std::env::var("DISPLAY").unwrap_or_default()
        );

        let (conn, screen_num) = x11rb::connect(None)
            .map_err(|e| seat_error!(display, "Не удалось подключиться к X-серверу: {}", e))?;

        let screen = &conn.setup().roots[screen_num];
        let (root, root_visual, white_pixel, depth) =
            (screen.root, screen.root_visual, screen.white_pixel, screen.root_depth);
        let (width, height) = (screen.width_in_pixels, screen.height_in_pixels);

        let window = conn.generate_id().map_err(|e| seat_error!(display, "{}", e))?;
        conn.create_window(
            COPY_DEPTH_FROM_PARENT,
            window,
            root,
            0,
            0,
            width,
            height,
            0,
            WindowClass::INPUT_OUTPUT,
            root_visual,
            &CreateWindowAux::new().background_pixel(white_pixel),
        )
        .map_err(|e| seat_error!(display, "Не удалось создать окно: {}", e))?;
        conn.map_window(window)
            .map_err(|e| seat_error!(display, "{}", e))?;

        let font = Self::open_font(&conn)?;
        let gc = conn.generate_id().map_err(|e| seat_error!(display, "{}", e))?;
        conn.create_gc(
            gc,
            window,
            &CreateGCAux::new()
                .foreground(TEXT_COLOR)
                .background(pixel(BACKGROUND))
                .font(font),
        )
        .map_err(|e| seat_error!(display, "{}", e))?;
        conn.flush().map_err(|e| seat_error!(display, "{}", e))?;

        info!("Окно {}x{} создано", width, height);

        Ok(Self {
            conn,
            window,
            gc,
            width,
            height,
            depth,
        })
    }

    fn open_font(conn: &RustConnection) -> Result<Font> {
        let font = conn.generate_id().map_err(|e| seat_error!(display, "{}", e))?;

        for pattern in FONT_PATTERNS {
            let opened = conn
                .open_font(font, pattern.as_bytes())
                .map_err(|e| seat_error!(display, "{}", e))?
                .check();

            match opened {
                Ok(()) => return Ok(font),
                Err(e) => warn!("Шрифт {} недоступен: {}", pattern, e),
            }
        }

        Err(seat_error!(display, "Не найден ни один шрифт X11"))
    }

    fn flush(&self) -> Result<()> {
        self.conn
            .flush()
            .map_err(|e| seat_error!(display, "{}", e))
    }
}

impl DisplaySurfaceTrait for X11Surface {
    fn set_title(&mut self, title: &str) -> Result<()> {
        self.conn
            .change_property8(
                PropMode::REPLACE,
                self.window,
                AtomEnum::WM_NAME,
                AtomEnum::STRING,
                title.as_bytes(),
            )
            .map_err(|e| seat_error!(display, "{}", e))?;
        self.flush()
    }

    fn load_image(&mut self, image_path: &Path) -> Result<()> {
        let picture = image::open(image_path)
            .map_err(|e| seat_error!(display, "Не удалось загрузить {}: {}", image_path.display(), e))?
            .to_rgba8();

        let image_width = u16::try_from(picture.width()).unwrap_or(u16::MAX).min(self.width);
        let image_height = u16::try_from(picture.height()).unwrap_or(u16::MAX).min(self.height);

        let mut frame = Image::allocate_native(image_width, image_height, self.depth, self.conn.setup())
            .map_err(|e| seat_error!(display, "{}", e))?;

        for (x, y, rgba) in picture.enumerate_pixels() {
            if x >= u32::from(image_width) || y >= u32::from(image_height) {
                continue;
            }
            let [r, g, b, a] = rgba.0;
            let color = [
                blend(r, BACKGROUND[0], a),
                blend(g, BACKGROUND[1], a),
                blend(b, BACKGROUND[2], a),
            ];
            frame.put_pixel(x as u16, y as u16, pixel(color));
        }

        self.conn
            .clear_area(false, self.window, 0, 0, 0, 0)
            .map_err(|e| seat_error!(display, "{}", e))?;
        self.conn
            .change_gc(self.gc, &ChangeGCAux::new().foreground(pixel(BACKGROUND)))
            .map_err(|e| seat_error!(display, "{}", e))?;
        self.conn
            .poly_fill_rectangle(
                self.window,
                self.gc,
                &[Rectangle {
                    x: 0,
                    y: 0,
                    width: self.width,
                    height: self.height,
                }],
            )
            .map_err(|e| seat_error!(display, "{}", e))?;
        self.conn
            .change_gc(self.gc, &ChangeGCAux::new().foreground(TEXT_COLOR))
            .map_err(|e| seat_error!(display, "{}", e))?;

        let x = ((self.width - image_width) / 2) as i16;
        let y = ((self.height - image_height) / 2) as i16;
        frame
            .put(&self.conn, self.window, self.gc, x, y)
            .map_err(|e| seat_error!(display, "{}", e))?;

        self.flush()
    }

    fn write_message(&mut self, message: &str) -> Result<()> {
        // Core-шрифты X11 понимают только Latin-1
        let text: Vec<u8> = message
            .chars()
            .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
            .take(255)
            .collect();

        let (x, y) = TEXT_POSITION;
        self.conn
            .image_text8(self.window, self.gc, x, y, &text)
            .map_err(|e| seat_error!(display, "{}", e))?;

        self.flush()
    }
}

impl Drop for X11Surface {
    fn drop(&mut self) {
        info!("Закрытие окна мастера");
        let _ = self.conn.destroy_window(self.window);
        let _ = self.conn.flush();
    }
}
