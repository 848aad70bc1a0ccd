/// Access log line: peer, request line, status, size, referer, user agent and seconds taken.
pub fn logger_format() -> &'static str {
    "%a \"%r\" %s %b \"%{Referer}i\" \"%{User-Agent}i\" %Ts"
}
