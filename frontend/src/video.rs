use anyhow::{anyhow, Result};
use chippy_core::{Chip8Color, Display, SCREEN_HEIGHT, SCREEN_WIDTH};
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

/// Window, canvas and the colors used to expand the monochrome framebuffer.
pub struct Video {
    canvas: Canvas<Window>,
    pixels: Vec<Chip8Color>,
    foreground: Chip8Color,
    background: Chip8Color,
}

impl Video {
    pub fn new(
        sdl_video: &sdl2::VideoSubsystem,
        title: &str,
        scale: u32,
        foreground: Chip8Color,
        background: Chip8Color,
    ) -> Result<Self> {
        let window = sdl_video
            .window(title, SCREEN_WIDTH as u32 * scale, SCREEN_HEIGHT as u32 * scale)
            .position_centered()
            .build()?;

        let mut canvas = window.into_canvas().accelerated().build()?;

        canvas.set_draw_color(Color::RGB(background.r, background.g, background.b));
        canvas.clear();
        canvas.present();

        Ok(Self {
            canvas,
            pixels: vec![background; SCREEN_WIDTH * SCREEN_HEIGHT],
            foreground,
            background,
        })
    }

    pub fn texture_creator(&self) -> TextureCreator<WindowContext> {
        self.canvas.texture_creator()
    }

    /// Create the streaming texture the framebuffer is uploaded into.
    pub fn create_texture<'r>(&self, creator: &'r TextureCreator<WindowContext>) -> Result<Texture<'r>> {
        let texture = creator.create_texture_streaming(
            PixelFormatEnum::RGBX8888,
            SCREEN_WIDTH as u32,
            SCREEN_HEIGHT as u32,
        )?;
        Ok(texture)
    }

    /// Upload the framebuffer if it changed since the last frame, then present.
    pub fn present(&mut self, texture: &mut Texture, display: &Display, dirty: bool) -> Result<()> {
        if dirty {
            display.render(&mut self.pixels, self.foreground, self.background);
            texture.update(None, bytemuck::cast_slice(&self.pixels[..]), SCREEN_WIDTH * 4)?;
        }

        self.canvas.clear();
        self.canvas.copy(texture, None, None).map_err(|e| anyhow!(e))?;
        self.canvas.present();
        Ok(())
    }
}
