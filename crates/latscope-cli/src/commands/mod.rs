pub mod completion;
pub mod locate;
pub mod run;
