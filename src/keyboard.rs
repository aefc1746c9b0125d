/// Anything that can answer "is virtual key `0x0..=0xF` held down right now".
pub trait KeySource {
    fn is_pressed(&self, key: u8) -> bool;
}

impl KeySource for [bool; 16] {
    fn is_pressed(&self, key: u8) -> bool {
        self[(key & 0xF) as usize]
    }
}

/// Pressed state of the 16-key hex keypad, as seen by the running program.
#[derive(Debug, Default)]
pub struct Keyboard {
    keys: [bool; 16],
}

impl Keyboard {
    pub fn new() -> Self {
        Self { keys: [false; 16] }
    }

    pub fn reset(&mut self) {
        self.keys = [false; 16];
    }

    /// Replace the whole vector from the input mapper.
    pub fn refresh(&mut self, source: &impl KeySource) {
        for (n, key) in self.keys.iter_mut().enumerate() {
            *key = source.is_pressed(n as u8);
        }
    }

    pub fn get_key_status_from_num(&self, n: u8) -> bool {
        self.keys[(n & 0xF) as usize]
    }

    /// The only pressed key, if exactly one is down.
    pub fn single_pressed(&self) -> Option<u8> {
        let mut pressed = self
            .keys
            .iter()
            .enumerate()
            .filter(|(_, down)| **down)
            .map(|(n, _)| n as u8);
        match (pressed.next(), pressed.next()) {
            (Some(key), None) => Some(key),
            _ => None,
        }
    }
}
