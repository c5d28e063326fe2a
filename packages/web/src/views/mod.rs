mod layout;
pub use layout::{AppLayout, GuardedLayout};

mod home;
pub use home::{Home, NotFound, Unauthorized};

mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod register_doctor;
pub use register_doctor::RegisterDoctor;

mod create_profile;
pub use create_profile::CreateProfile;

mod dashboard;
pub use dashboard::{AdminDashboard, DoctorDashboard, UserDashboard};

mod member;
pub use member::{Community, Consultation};

mod shop;
pub use shop::Shop;

mod cart;
pub use cart::Cart;
