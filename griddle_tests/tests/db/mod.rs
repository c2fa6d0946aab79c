mod end_to_end;
mod key_round_trip;
