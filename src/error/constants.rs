use super::const_error;

const_error!(INTERNAL, INTERNAL_SERVER_ERROR, "internal server error");
const_error!(DATABASE_ERROR, INTERNAL_SERVER_ERROR, "database error");
const_error!(JSON_MISSING_FIELDS, BAD_REQUEST, "missing or invalid fields");
const_error!(JSON_SYNTAX_ERROR, BAD_REQUEST, "syntax error");
const_error!(JSON_CONTENT_TYPE, BAD_REQUEST, "missing or wrong content-type");
const_error!(INVALID_QUERY, BAD_REQUEST, "invalid query string");
const_error!(MULTIPART_ERROR, BAD_REQUEST, "malformed multipart form");
const_error!(VALIDATION_FAILED, BAD_REQUEST, "invalid data");
const_error!(NOT_AUTHENTICATED, UNAUTHORIZED, "authentication required");
const_error!(INVALID_CREDENTIALS, UNAUTHORIZED, "invalid username or password");
const_error!(
    ACCOUNT_LOCKED,
    FORBIDDEN,
    "too many failed login attempts, try again later"
);
const_error!(NOT_STAFF, FORBIDDEN, "staff account required");
const_error!(PROBLEM_NOT_FOUND, NOT_FOUND, "problem not found");
const_error!(TAG_NOT_FOUND, NOT_FOUND, "tag not found");
const_error!(USER_NOT_FOUND, NOT_FOUND, "user not found");
const_error!(QUESTION_NOT_FOUND, NOT_FOUND, "question not found");
const_error!(PAGE_NOT_FOUND, NOT_FOUND, "invalid page");
const_error!(TAG_ALREADY_EXISTS, BAD_REQUEST, "tag already exists for this grade");
