mod platform;

use glfw::{Action, Context as _, Key, Modifiers, SwapInterval, WindowEvent, WindowMode};
use luminance::framebuffer::FramebufferError;
use luminance_glfw::{GlfwSurface, GlfwSurfaceError};
use platform::{DesktopFetchError, DesktopPlatformServices};
use std::{error::Error, fmt, iter, path::PathBuf, time::Instant};
use structopt::StructOpt;
use textbook_samples::{Example, InputAction, LoopFeedback, SampleError};

const WINDOW_WIDTH: u32 = 960;
const WINDOW_HEIGHT: u32 = 540;

#[derive(Debug, StructOpt)]
pub struct CLIOpts {
  #[structopt(short, long, default_value = ".")]
  /// Directory where to pick textures from.
  textures: PathBuf,

  #[structopt(short, long)]
  /// List available samples.
  list_examples: bool,

  /// Sample to run.
  example: Option<String>,
}

/// Macro to declaratively add samples.
macro_rules! examples {
  ($($ex_name:literal => $ex_ty:path),* $(,)?) => {
    fn show_available_examples() {
      println!("available samples:");
      $( println!("  - {}", $ex_name); )*
    }

    // create a function that will run a sample based on its name
    fn pick_and_run_example(cli_opts: CLIOpts) {
      let example_name = cli_opts.example.as_deref();
      let result = match example_name {
        $(
          Some($ex_name) => run_example::<$ex_ty>(&cli_opts, $ex_name),
        )*

        _ => {
          log::error!("no sample found");
          show_available_examples();
          return;
        }
      };

      if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
      }
    }
  }
}

/// Failures preventing a sample from running.
#[derive(Debug)]
enum RunError {
  Textures(DesktopFetchError),
  Surface(GlfwSurfaceError<WindowError>),
  BackBuffer(FramebufferError),
  Bootstrap(SampleError),
}

impl fmt::Display for RunError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      RunError::Textures(ref e) => write!(f, "cannot load textures: {}", e),
      RunError::Surface(ref e) => write!(f, "cannot create GLFW surface: {}", e),
      RunError::BackBuffer(ref e) => write!(f, "cannot get the back buffer: {}", e),
      RunError::Bootstrap(ref e) => write!(f, "cannot bootstrap sample: {}", e),
    }
  }
}

impl Error for RunError {}

impl From<DesktopFetchError> for RunError {
  fn from(e: DesktopFetchError) -> Self {
    RunError::Textures(e)
  }
}

impl From<GlfwSurfaceError<WindowError>> for RunError {
  fn from(e: GlfwSurfaceError<WindowError>) -> Self {
    RunError::Surface(e)
  }
}

impl From<FramebufferError> for RunError {
  fn from(e: FramebufferError) -> Self {
    RunError::BackBuffer(e)
  }
}

impl From<SampleError> for RunError {
  fn from(e: SampleError) -> Self {
    RunError::Bootstrap(e)
  }
}

/// GLFW didn’t give us a window.
#[derive(Debug)]
struct WindowError;

impl fmt::Display for WindowError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str("cannot create window")
  }
}

impl Error for WindowError {}

// Run a sample.
fn run_example<E>(cli_opts: &CLIOpts, name: &str) -> Result<(), RunError>
where
  E: Example,
{
  // Check the features so that we know what we need to load.
  let mut services = DesktopPlatformServices::new(&cli_opts.textures, &E::features())?;

  // First thing first: we create a new surface to render to and get events from.
  let surface = GlfwSurface::new(|glfw| {
    let (mut window, events) =
      match glfw.create_window(WINDOW_WIDTH, WINDOW_HEIGHT, name, WindowMode::Windowed) {
        Some(created) => created,
        None => return Err(GlfwSurfaceError::UserError(WindowError)),
      };

    window.make_current();
    window.set_all_polling(true);
    glfw.set_swap_interval(SwapInterval::Sync(1));

    Ok((window, events))
  })?;
  let mut context = surface.context;
  let events = surface.events_rx;

  let example = E::bootstrap(&mut services, &mut context)?;
  log::info!("running {}", name);
  let start_t = Instant::now();

  // render a first frame to pass the initial framebuffer size; samples compute their projection
  // out of it
  let (fb_w, fb_h) = context.window.get_framebuffer_size();
  let back_buffer = context.back_buffer()?;
  let feedback = example.render_frame(
    0.,
    back_buffer,
    iter::once(InputAction::Resized {
      width: fb_w as _,
      height: fb_h as _,
    }),
    &mut context,
  );
  let mut example = match feedback {
    LoopFeedback::Exit => return Ok(()),
    LoopFeedback::Continue(example) => {
      context.window.swap_buffers();
      example
    }
  };

  'app: loop {
    // handle events
    context.window.glfw.poll_events();
    let actions = glfw::flush_messages(&events).flat_map(|(_, event)| adapt_events(event));

    let t = start_t.elapsed().as_secs_f32();
    let back_buffer = context.back_buffer()?;
    let feedback = example.render_frame(t, back_buffer, actions, &mut context);

    if let LoopFeedback::Continue(stepped) = feedback {
      example = stepped;
      context.window.swap_buffers();
    } else {
      break 'app;
    }
  }

  Ok(())
}

fn adapt_events(event: WindowEvent) -> Option<InputAction> {
  match event {
    WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Release, _) => {
      Some(InputAction::Quit)
    }

    WindowEvent::Key(Key::Space, _, Action::Release, mods) => {
      if mods.is_empty() {
        Some(InputAction::MainToggle)
      } else if mods == Modifiers::Shift {
        Some(InputAction::AuxiliaryToggle)
      } else {
        None
      }
    }

    WindowEvent::Key(key, _, Action::Press, _) | WindowEvent::Key(key, _, Action::Repeat, _) => {
      log::debug!("key press: {:?}", key);
      match key {
        Key::Up => Some(InputAction::Up),
        Key::Down => Some(InputAction::Down),
        Key::Left | Key::A => Some(InputAction::Left),
        Key::Right | Key::D => Some(InputAction::Right),
        Key::PageUp | Key::W => Some(InputAction::Forward),
        Key::PageDown | Key::S => Some(InputAction::Backward),
        _ => None,
      }
    }

    WindowEvent::FramebufferSize(width, height) => Some(InputAction::Resized {
      width: width.max(0) as _,
      height: height.max(0) as _,
    }),

    _ => None,
  }
}

examples! {
  "circle" => textbook_samples::circle::LocalExample,
  "plane-curves" => textbook_samples::plane_curves::LocalExample,
  "helix" => textbook_samples::helix::LocalExample,
  "sphere" => textbook_samples::surfaces::SphereExample,
  "hemisphere" => textbook_samples::surfaces::HemisphereExample,
  "torus" => textbook_samples::surfaces::TorusExample,
  "cylinder" => textbook_samples::surfaces::CylinderExample,
  "cone" => textbook_samples::surfaces::ConeExample,
  "paraboloid" => textbook_samples::surfaces::ParaboloidExample,
  "helical-pipe" => textbook_samples::surfaces::HelicalPipeExample,
  "table" => textbook_samples::surfaces::TableExample,
  "bezier-patch" => textbook_samples::surfaces::BezierPatchExample,
  "bezier-curve" => textbook_samples::bezier_curve::LocalExample,
  "bspline" => textbook_samples::bspline::LocalExample,
  "textured-square" => textbook_samples::textured_square::LocalExample,
}

fn main() {
  env_logger::builder()
    .filter_level(log::LevelFilter::Info)
    .parse_default_env()
    .init();
  let cli_opts = CLIOpts::from_args();

  if cli_opts.list_examples {
    show_available_examples();
  } else {
    pick_and_run_example(cli_opts);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(key: Key, action: Action, mods: Modifiers) -> WindowEvent {
    WindowEvent::Key(key, 0, action, mods)
  }

  #[test]
  fn space_toggles() {
    assert_eq!(
      adapt_events(key(Key::Space, Action::Release, Modifiers::empty())),
      Some(InputAction::MainToggle)
    );
    assert_eq!(
      adapt_events(key(Key::Space, Action::Release, Modifiers::Shift)),
      Some(InputAction::AuxiliaryToggle)
    );
    assert_eq!(
      adapt_events(key(Key::Space, Action::Release, Modifiers::Control)),
      None
    );
  }

  #[test]
  fn arrows_and_aliases() {
    let press = |k| adapt_events(key(k, Action::Press, Modifiers::empty()));

    assert_eq!(press(Key::Up), Some(InputAction::Up));
    assert_eq!(press(Key::Down), Some(InputAction::Down));
    assert_eq!(press(Key::Left), Some(InputAction::Left));
    assert_eq!(press(Key::A), Some(InputAction::Left));
    assert_eq!(press(Key::D), Some(InputAction::Right));
    assert_eq!(press(Key::PageUp), Some(InputAction::Forward));
    assert_eq!(press(Key::S), Some(InputAction::Backward));
    assert_eq!(press(Key::Q), None);
  }

  #[test]
  fn held_keys_repeat() {
    assert_eq!(
      adapt_events(key(Key::Right, Action::Repeat, Modifiers::empty())),
      Some(InputAction::Right)
    );
  }

  #[test]
  fn quit_and_resize() {
    assert_eq!(adapt_events(WindowEvent::Close), Some(InputAction::Quit));
    assert_eq!(
      adapt_events(key(Key::Escape, Action::Release, Modifiers::empty())),
      Some(InputAction::Quit)
    );
    assert_eq!(
      adapt_events(WindowEvent::FramebufferSize(800, 600)),
      Some(InputAction::Resized {
        width: 800,
        height: 600
      })
    );
  }

  #[test]
  fn backend_comes_through_luminance_glfw() {
    let manifest = include_str!("../Cargo.toml");

    assert!(manifest.contains("luminance-glfw"));
    assert!(!manifest.contains("luminance-gl ="));
  }

  #[test]
  fn cli() {
    let opts = CLIOpts::from_iter(&["textbook-samples-desktop", "-t", "bitmaps", "torus"]);

    assert_eq!(opts.textures, PathBuf::from("bitmaps"));
    assert_eq!(opts.example.as_deref(), Some("torus"));
    assert!(!opts.list_examples);

    let opts = CLIOpts::from_iter(&["textbook-samples-desktop", "--list-examples"]);
    assert!(opts.list_examples);
    assert_eq!(opts.textures, PathBuf::from("."));
  }
}
