use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use thiserror::Error;

use crate::input::{InputEvent, Key, MouseButton};

#[derive(Debug, Error)]
#[error("sdl: {0}")]
pub struct WindowError(String);

impl From<String> for WindowError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

pub struct FrameLimiter {
    frame_target_ms: u64,
    previous_frame_time: u64,
}

impl FrameLimiter {
    pub fn new(window: &Window, fps: u32) -> Self {
        Self {
            frame_target_ms: 1000 / u64::from(fps.max(1)),
            previous_frame_time: window.timer().ticks64(),
        }
    }

    /// Waits if necessary to maintain frame rate and returns the delta time in milliseconds.
    pub fn wait_and_get_delta(&mut self, window: &Window) -> u64 {
        let mut current_time = window.timer().ticks64();
        let mut delta_time = current_time - self.previous_frame_time;

        if delta_time < self.frame_target_ms {
            let time_to_wait = self.frame_target_ms - delta_time;
            std::thread::sleep(std::time::Duration::from_millis(time_to_wait));
            current_time = window.timer().ticks64();
            delta_time = current_time - self.previous_frame_time;
        }

        self.previous_frame_time = current_time;
        delta_time
    }
}

pub struct Window {
    texture: sdl2::render::Texture<'static>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, WindowError> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // The texture field is declared first, so it drops before its creator.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            texture,
            texture_creator,
            canvas,
            event_pump,
            timer_subsystem,
            width,
            height,
        })
    }

    /// Drains pending SDL events, translated into [`InputEvent`]s.
    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        self.event_pump.poll_iter().filter_map(translate).collect()
    }

    pub fn present(&mut self, buffer: &[u8]) -> Result<(), WindowError> {
        self.texture
            .update(None, buffer, (self.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))?;
        self.canvas.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), WindowError> {
        self.width = width;
        self.height = height;
        // SAFETY: Same as in new() - texture_creator outlives texture
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(self.texture_creator.as_ref() as *const _) };
        self.texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }
}

fn translate(event: Event) -> Option<InputEvent> {
    let input = match event {
        Event::Quit { .. } => InputEvent::Quit,
        Event::KeyDown {
            keycode: Some(keycode),
            ..
        } => InputEvent::KeyPressed(map_key(keycode)),
        Event::MouseMotion { x, y, .. } => InputEvent::MouseMoved { x, y },
        Event::MouseButtonDown { mouse_btn, x, y, .. } => InputEvent::MousePressed {
            button: map_button(mouse_btn),
            x,
            y,
        },
        Event::Window { win_event, .. } => match win_event {
            WindowEvent::Resized(w, h) => InputEvent::Resized {
                width: w.max(1) as u32,
                height: h.max(1) as u32,
            },
            WindowEvent::FocusGained => InputEvent::FocusGained,
            WindowEvent::FocusLost => InputEvent::FocusLost,
            _ => return None,
        },
        _ => return None,
    };
    Some(input)
}

fn map_key(keycode: Keycode) -> Key {
    match keycode {
        Keycode::W => Key::W,
        Keycode::A => Key::A,
        Keycode::S => Key::S,
        Keycode::D => Key::D,
        Keycode::Q => Key::Q,
        Keycode::E => Key::E,
        Keycode::Z => Key::Z,
        Keycode::C => Key::C,
        Keycode::R => Key::R,
        Keycode::F => Key::F,
        Keycode::Space => Key::Space,
        Keycode::LShift => Key::LShift,
        Keycode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

fn map_button(button: sdl2::mouse::MouseButton) -> MouseButton {
    match button {
        sdl2::mouse::MouseButton::Left => MouseButton::Left,
        sdl2::mouse::MouseButton::Right => MouseButton::Right,
        sdl2::mouse::MouseButton::Middle => MouseButton::Middle,
        _ => MouseButton::Other,
    }
}
