mod bookings;
mod helper;
