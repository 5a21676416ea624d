#[macro_use]
extern crate rocket;

mod config;
mod device;
mod error;
mod light;
mod modes;
mod pairing;
mod session;
mod view;
mod widgets;


// Web app
use rocket::fairing::AdHoc;
use rocket::form::Form;
use rocket::http::ContentType;
use rocket::response::stream::TextStream;
use rocket::response::Redirect;
use rocket::{Build, Rocket, State};

// Templates engine
use rocket_dyn_templates::Template;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::DashboardConfig;
use crate::device::PairingRequest;
use crate::error::PairingRejected;
use crate::light::{Brightness, LightEvent};
use crate::pairing::{Handshake, PairingUpdate};
use crate::session::{ActiveSession, Page, Sessions};
use crate::view::{ControlView, LandingView, PairingPage};

// Value posted by a control page switch.
#[derive(Debug, FromForm)]
struct Switch {
    value: bool,
}

// Value posted by the brightness slider.
#[derive(Debug, FromForm)]
struct Level {
    value: Brightness,
}

// Renders the current page of the session.
#[get("/")]
async fn index(session: ActiveSession) -> Template {
    let mut session = session.lock().await;

    if let (Page::Control, Some(device)) = (session.page(), session.selected()) {
        return Template::render("control", ControlView::new(device, session.light()));
    }

    let pairing = session.take_pairing_report();
    Template::render("index", LandingView::new(session.devices(), pairing))
}

// Pairs a new device.
//
// Each handshake phase is streamed to the browser as it starts, then the
// page reloads the dashboard. The session stays locked while the handshake
// runs.
#[post("/pair", data = "<form>")]
async fn pair(
    form: Form<PairingRequest<'_>>,
    session: ActiveSession,
    config: &State<DashboardConfig>,
) -> Result<(ContentType, TextStream![String]), PairingRejected> {
    let session = session.lock_owned().await;

    let device = match form.validate() {
        Ok(device) => device,
        Err(errors) => {
            debug!("Pairing form rejected: {:?}", errors);
            let view = LandingView::new(session.devices(), None).rejected(
                form.room_name,
                form.device_id,
                &errors,
            );
            return Err(PairingRejected(Template::render("index", view)));
        }
    };

    let head = PairingPage::head(&device);
    let handshake = Handshake::new(config.pairing_phase_delay());
    let mut progress = handshake.spawn(device, session);

    Ok((
        ContentType::HTML,
        TextStream! {
            yield head;
            while let Some(update) = progress.recv().await {
                yield match update {
                    PairingUpdate::Phase(phase) => PairingPage::phase(phase),
                    PairingUpdate::Paired(report) => PairingPage::done(&report),
                };
            }
        },
    ))
}

// Opens a device on the control page.
#[post("/devices/<position>")]
async fn open_device(position: usize, session: ActiveSession) -> Option<Redirect> {
    session.lock().await.open_device(position)?;
    Some(Redirect::to(uri!(index)))
}

// Goes back to the landing page.
#[post("/back")]
async fn back(session: ActiveSession) -> Redirect {
    session.lock().await.back();
    Redirect::to(uri!(index))
}

async fn update(session: ActiveSession, event: LightEvent) -> Redirect {
    session.lock().await.update(event);
    Redirect::to(uri!(index))
}

#[post("/light/power", data = "<form>")]
async fn set_power(form: Form<Switch>, session: ActiveSession) -> Redirect {
    update(session, LightEvent::SetPower(form.value)).await
}

#[post("/light/brightness", data = "<form>")]
async fn set_brightness(form: Form<Level>, session: ActiveSession) -> Redirect {
    update(session, LightEvent::SetBrightness(form.value)).await
}

#[post("/light/reading-mode", data = "<form>")]
async fn set_reading_mode(form: Form<Switch>, session: ActiveSession) -> Redirect {
    update(session, LightEvent::SetReadingMode(form.value)).await
}

#[post("/light/dim-mode", data = "<form>")]
async fn set_dim_mode(form: Form<Switch>, session: ActiveSession) -> Redirect {
    update(session, LightEvent::SetDimMode(form.value)).await
}

// Mounts routes, state and fairings on a Rocket instance.
fn dashboard(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount(
            "/",
            routes![
                index,
                pair,
                open_device,
                back,
                set_power,
                set_brightness,
                set_reading_mode,
                set_dim_mode
            ],
        )
        .manage(Sessions::default())
        .attach(AdHoc::config::<DashboardConfig>())
        .attach(Template::fairing())
        .register("/", error::catchers())
}

#[launch]
fn rocket() -> _ {
    // Enable tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dashboard(rocket::build())
}
