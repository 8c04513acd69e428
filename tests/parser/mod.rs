mod tests_error_display;
mod tests_lookahead;
mod tests_precedence;
mod tests_programs;
mod tests_properties;
mod tests_recovery;
