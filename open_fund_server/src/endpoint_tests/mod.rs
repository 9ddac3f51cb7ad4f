mod contributions;
mod helpers;
mod targets;
