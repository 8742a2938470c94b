pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod feat;
pub mod ftpcommand;
pub mod handlers;
pub mod list;
pub mod login;
pub mod mdtm;
pub mod mkd;
pub mod mlsd;
pub mod noop;
pub mod parser;
pub mod pwd;
pub mod reply;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod site;
pub mod size;
pub mod stat;
pub mod stor;
pub mod syst;
pub mod typemode;
pub mod utils;
