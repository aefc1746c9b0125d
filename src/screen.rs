use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use crate::{
    config::WindowScale,
    display::{FrameBuffer, HEIGHT, WIDTH},
    keyboard::KeySource,
};

const TITLE: &str = "emuchip - ESC to exit";

/// Physical key for each hex key, indexed by key value.
///
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
const KEYMAP: [Key; 16] = [
    Key::X,    // 0
    Key::Key1, // 1
    Key::Key2, // 2
    Key::Key3, // 3
    Key::Q,    // 4
    Key::W,    // 5
    Key::E,    // 6
    Key::A,    // 7
    Key::S,    // 8
    Key::D,    // 9
    Key::Z,    // A
    Key::C,    // B
    Key::Key4, // C
    Key::R,    // D
    Key::F,    // E
    Key::V,    // F
];

impl From<WindowScale> for Scale {
    fn from(scale: WindowScale) -> Self {
        match scale {
            WindowScale::X1 => Scale::X1,
            WindowScale::X2 => Scale::X2,
            WindowScale::X4 => Scale::X4,
            WindowScale::X8 => Scale::X8,
            WindowScale::X16 => Scale::X16,
            WindowScale::X32 => Scale::X32,
        }
    }
}

/// Desktop window: renders the framebuffer and serves as the keypad.
pub struct Screen {
    pixel_buffer: Vec<u32>,
    window: Window,
    beeping: bool,
}

impl Screen {
    pub fn new(scale: WindowScale) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            TITLE,
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: scale.into(),
                ..WindowOptions::default()
            },
        )?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            pixel_buffer: vec![0; WIDTH * HEIGHT],
            window,
            beeping: false,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_pressed(Key::Escape, KeyRepeat::Yes)
    }

    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), minifb::Error> {
        frame_to_pixels(frame, &mut self.pixel_buffer);
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
    }

    /// Poll input without presenting a new frame.
    pub fn update(&mut self) {
        self.window.update();
    }

    /// The sound timer has no audio behind it; flag it in the title bar instead.
    pub fn set_beeping(&mut self, beeping: bool) {
        if beeping != self.beeping {
            self.beeping = beeping;
            if beeping {
                self.window.set_title(&format!("{TITLE} [beep]"));
            } else {
                self.window.set_title(TITLE);
            }
        }
    }
}

impl KeySource for Screen {
    fn is_pressed(&self, key: u8) -> bool {
        self.window.is_key_down(KEYMAP[(key & 0xF) as usize])
    }
}

fn from_u16_rgb(r: u16, g: u16, b: u16) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

fn frame_to_pixels(frame: &FrameBuffer, pixels: &mut [u32]) {
    let on = from_u16_rgb(0, 127, 255);
    let off = from_u16_rgb(0, 0, 0);
    for (pixel, &lit) in pixels.iter_mut().zip(frame.rows().iter().flatten()) {
        *pixel = if lit { on } else { off };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_to_pixels() {
        let mut frame = FrameBuffer::new();
        frame.paint(1, 1, &[0b1000_0000]);
        let mut pixels = vec![0xDEAD; WIDTH * HEIGHT];
        frame_to_pixels(&frame, &mut pixels);

        assert_eq!(pixels[0], 0x000000);
        assert_eq!(pixels[WIDTH + 1], 0x007FFF);
        assert_eq!(pixels.iter().filter(|&&px| px != 0).count(), 1);
    }

    #[test]
    fn test_keymap_covers_every_key_once() {
        for (n, key) in KEYMAP.iter().enumerate() {
            assert!(!KEYMAP[n + 1..].contains(key), "{key:?} mapped twice");
        }
    }
}
