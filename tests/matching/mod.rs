mod request_patterns;
